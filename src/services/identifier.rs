//! Identifier extraction from page URLs.

use regex::Regex;

use crate::types::errors::TrackerError;

/// Extracts an identifier token from a URL with a regular expression.
///
/// The token is the first capture group, or the whole match when the
/// pattern has no groups. A URL that does not match yields `None`.
#[derive(Debug, Clone)]
pub struct IdentifierExtractor {
    pattern: Regex,
}

impl IdentifierExtractor {
    pub fn new(pattern: &str) -> Result<Self, TrackerError> {
        let pattern = Regex::new(pattern).map_err(|e| TrackerError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { pattern })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn matches(&self, url: &str) -> bool {
        self.pattern.is_match(url)
    }

    pub fn extract(&self, url: &str) -> Option<String> {
        let caps = self.pattern.captures(url)?;
        caps.get(1)
            .or_else(|| caps.get(0))
            .map(|m| m.as_str().to_string())
    }
}
