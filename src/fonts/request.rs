//! Font identification parsed from the inbound path.

use crate::error::{RelayError, RelayResult};

/// A validated font request. Built once per inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontRequest {
    family: String,
    weight: String,
    text: Option<String>,
}

impl FontRequest {
    /// Build a request from decoded path segments.
    ///
    /// The family is normalized to a leading capital with the rest lowercased,
    /// because the CSS API is case-sensitive on family names. The weight is
    /// not validated; the upstream decides which tokens exist. An
    /// empty `text` is treated as absent.
    pub fn new(family: &str, weight: &str, text: Option<&str>) -> RelayResult<Self> {
        let family = family.trim();
        if family.is_empty() {
            return Err(RelayError::InvalidRequest("font family must not be empty".into()));
        }

        Ok(Self {
            family: normalize_family(family),
            weight: weight.to_string(),
            text: text.filter(|t| !t.is_empty()).map(str::to_string),
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn weight(&self) -> &str {
        &self.weight
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

fn normalize_family(family: &str) -> String {
    let mut chars = family.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
