use thiserror::Error;

/// Errors from building the client or decoding a normalized payload.
///
/// Request-time failures never appear here; they are folded into
/// [`crate::NormalizedResponse`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The underlying `reqwest::Client` could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    /// A payload did not match the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
