use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Client(#[from] mpa_client::ClientError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no billing profile is saved; create one before purchasing")]
    MissingProfile,

    #[error("purchase rejected: {0}")]
    PurchaseRejected(String),

    #[error("{context} failed: {message}")]
    Api { context: String, message: String },

    #[error(transparent)]
    Settings(#[from] mpa_core::SettingsError),
}

impl SearchError {
    /// Builds an [`SearchError::Api`] from a failed response.
    pub(crate) fn api(context: &str, response: &mpa_client::NormalizedResponse) -> Self {
        let message = response
            .error
            .clone()
            .or_else(|| {
                response
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("{} {}", response.status, response.status_text));
        SearchError::Api {
            context: context.to_string(),
            message,
        }
    }
}
