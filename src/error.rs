use std::error::Error as StdError;
use thiserror::Error;

/// Everything that can turn a lookup into a failure.
///
/// The `Display` text of each variant is what the user sees.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Postal code must be exactly 6 digits.")]
    InvalidPincode,
    /// the service answered with `"Status": "Error"`
    #[error("{}", .0.as_deref().unwrap_or("API error"))]
    Api(Option<String>),
    #[error("Invalid response from API")]
    MalformedResponse,
    #[error("Network error while fetching data")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),
}

impl LookupError {
    pub fn transport(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Transport(err.into())
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_falls_back_to_generic_message() {
        assert_eq!(LookupError::Api(None).to_string(), "API error");
        assert_eq!(
            LookupError::Api(Some("No records found".into())).to_string(),
            "No records found"
        );
    }

    #[test]
    fn transport_hides_source_from_user_text() {
        let err = LookupError::transport(std::io::Error::other("connection reset"));
        assert_eq!(err.to_string(), "Network error while fetching data");
        assert!(err.source().is_some());
    }
}
