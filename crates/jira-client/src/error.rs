use thiserror::Error;

/// Why a single search could not produce issues.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, TLS, or timeout failure before a response was read.
    #[error("request to JIRA failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-2xx status.
    #[error("JIRA API call failed ({status}): {message}")]
    Api { status: u16, message: String },
    /// The response body was not a search result.
    #[error("malformed JIRA response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("request cancelled")]
    Cancelled,
}

impl FetchError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
