use thiserror::Error;

/// Reasons an Admin API key cannot be used to sign a request.
///
/// Raised locally, before any request is built.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The key does not contain exactly one `:` separator
    #[error("invalid API key format: expected 'id:secret'")]
    Format,

    #[error("invalid API key format: id cannot be empty")]
    EmptyId,

    #[error("invalid API key format: secret cannot be empty")]
    EmptySecret,

    /// The secret half is not valid hexadecimal
    #[error("invalid API key secret: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("invalid API key secret: unusable as a signing key")]
    SigningKey,
}

/// Main error type for Admin API operations
#[derive(Debug, Error)]
pub enum GhostError {
    /// The API key could not be turned into a signed token
    #[error("generating token: {0}")]
    Token(#[source] CredentialError),

    /// Error reported by the Admin API (status >= 400)
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A lookup succeeded at the HTTP level but matched no record
    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    /// A create or update succeeded at the HTTP level but echoed no record
    #[error("no {kind} returned")]
    NoneReturned { kind: &'static str },

    /// A fetched record lacks a field needed for a follow-up request
    #[error("{kind} has no {field}")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    /// Success response body did not match the expected JSON shape
    #[error("decoding response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Request body could not be serialized to JSON
    #[error("encoding request: {0}")]
    Encode(#[source] serde_json::Error),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GhostError {
    /// Build an API error from a status and the message derived from the body
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        GhostError::Api {
            status,
            message: message.into(),
        }
    }

    /// Check if this error means the record does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GhostError::NotFound { .. } | GhostError::Api { status: 404, .. }
        )
    }

    /// Check if the server rejected a write because `updated_at` was stale (409)
    pub fn is_conflict(&self) -> bool {
        matches!(self, GhostError::Api { status: 409, .. })
    }

    /// Get the HTTP status code if the server reported one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GhostError::Api { status, .. } => Some(*status),
            GhostError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for Admin API operations
pub type Result<T> = std::result::Result<T, GhostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let error = GhostError::api(422, "Validation failed: Title is required");
        assert_eq!(
            error.to_string(),
            "API error (422): Validation failed: Title is required"
        );
        assert_eq!(error.status_code(), Some(422));
    }

    #[test]
    fn test_error_not_found() {
        let error = GhostError::NotFound {
            kind: "tag",
            key: "missing".to_string(),
        };
        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "tag not found: missing");
        assert_eq!(error.status_code(), None);

        assert!(GhostError::api(404, "Resource not found").is_not_found());
        assert!(!GhostError::api(500, "boom").is_not_found());
    }

    #[test]
    fn test_error_conflict() {
        assert!(GhostError::api(409, "Saving failed").is_conflict());
        assert!(!GhostError::api(422, "Validation failed").is_conflict());
    }

    #[test]
    fn test_token_error_wraps_credential_error() {
        let error = GhostError::Token(CredentialError::EmptyId);
        assert_eq!(
            error.to_string(),
            "generating token: invalid API key format: id cannot be empty"
        );
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_none_returned_display() {
        let error = GhostError::NoneReturned { kind: "webhook" };
        assert_eq!(error.to_string(), "no webhook returned");
    }
}
