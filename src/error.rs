use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{0}")]
    Validation(String),

    #[error("Network error. Please try again.")]
    Network(#[source] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Malformed(String),

    #[error("{0}")]
    Upstream(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("no active session")]
    NoSession,
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }

    /// Wire name of the error class, used by the shell to pick a UI cue.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::Validation(_) => "validation",
            CoreError::Network(_) => "network",
            CoreError::Http { .. } | CoreError::Upstream(_) => "http",
            CoreError::Malformed(_) => "malformed",
            CoreError::Storage(_) => "storage",
            CoreError::NoSession => "session",
        }
    }

    pub fn retryable(&self) -> bool {
        matches!(
            self,
            CoreError::Network(_)
                | CoreError::Http { .. }
                | CoreError::Upstream(_)
                | CoreError::Malformed(_)
        )
    }
}

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Storage(e.to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
