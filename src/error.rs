use thiserror::Error;

#[derive(Error, Debug)]
pub enum GordaError {
    #[error("Request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Backend returned {status} for {endpoint}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    #[error("Could not decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GUI error: {0}")]
    Gui(String),

    #[error("Unsupported shell: {0}")]
    UnsupportedShell(String),
}

impl GordaError {
    /// Whether the error came from talking to the backend (as opposed to local setup).
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            GordaError::Http { .. } | GordaError::Status { .. } | GordaError::Decode { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, GordaError>;
