//! Target URL validation
//!
//! Runs before anything touches the network. The scheme check is done on the
//! raw input rather than on the parsed URL, so `HTTPS://host` is rejected even
//! though a URL parser would happily lowercase it.

use thiserror::Error;
use url::Url;

/// Reason a target was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a URL")]
    EmptyInput,
    #[error("Please enter a valid URL starting with http:// or https://")]
    MalformedUrl,
    #[error("Please enter a valid URL starting with http:// or https://")]
    UnsupportedScheme,
}

/// A target that passed validation, kept exactly as the user typed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidUrl(String);

impl ValidUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for ValidUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validate a candidate target URL
pub fn validate(raw: &str) -> Result<ValidUrl, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    if Url::parse(raw).is_err() {
        return Err(ValidationError::MalformedUrl);
    }

    if !(raw.starts_with("http://") || raw.starts_with("https://")) {
        return Err(ValidationError::UnsupportedScheme);
    }

    Ok(ValidUrl(raw.to_string()))
}
