//! Requested-category parsing.
//!
//! The CLI takes one comma-separated list of category names. A request is
//! kept as its raw token until resolution so an unrecognized name can
//! still be surfaced verbatim in the `unknown` record. The only argument
//! form is `bandwidth:<iface>`, restricting the bandwidth sampler to one
//! interface.

use sp_common::{Category, Error, Result};

/// One requested category, unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRequest {
    raw: String,
}

impl CategoryRequest {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The raw token as the user typed it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Parse a comma-separated list, trimming, dropping empties, and
    /// de-duplicating while preserving first-seen order.
    pub fn parse_list(input: &str) -> Vec<CategoryRequest> {
        let mut seen = Vec::new();
        for token in input.split(',') {
            let token = token.trim();
            if token.is_empty() || seen.iter().any(|r: &CategoryRequest| r.raw == token) {
                continue;
            }
            seen.push(CategoryRequest::new(token));
        }
        seen
    }

    /// The default request set: every canonical category except bandwidth.
    pub fn defaults() -> Vec<CategoryRequest> {
        Category::default_set()
            .into_iter()
            .map(|c| CategoryRequest::new(c.as_str()))
            .collect()
    }

    /// Resolve to a registry category plus the optional per-request
    /// argument. Only bandwidth accepts one; anything else with an
    /// argument is unknown.
    pub fn resolve(&self) -> Result<(Category, Option<String>)> {
        let (name, arg) = match self.raw.split_once(':') {
            Some((name, arg)) => (name, Some(arg.to_string())),
            None => (self.raw.as_str(), None),
        };
        let category = Category::lookup(name).map_err(|_| Error::UnknownCategory {
            name: self.raw.clone(),
        })?;
        if arg.is_some() && category != Category::Bandwidth {
            return Err(Error::UnknownCategory {
                name: self.raw.clone(),
            });
        }
        Ok((category, arg))
    }
}
