//! User-facing error taxonomy.
//!
//! Every loader and action returns [`AppError`]. Its `Display` text is what the
//! front end shows; nothing here is fatal and nothing is retried automatically.

use api::FetchError;
use store::StoreError;

/// Generic text for server failures that carry no message.
pub const GENERIC_FAILURE: &str = "Something went wrong, please try again.";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppError {
    /// Input rejected before any request was made.
    #[error("{0}")]
    Validation(String),

    /// The action needs a session and there is none.
    #[error("User is not authenticated.")]
    AuthorizationMissing,

    #[error("Network error. Please check your internet connection.")]
    Network(String),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response from the server.")]
    Parse(String),

    /// The server accepted the credentials but the account may not use this app.
    #[error("This account ({}) is not allowed to sign in here.", actual.as_deref().unwrap_or("no role"))]
    RoleMismatch {
        expected: String,
        actual: Option<String>,
    },

    #[error("Could not save the session: {0}")]
    Storage(String),
}

impl AppError {
    /// Classify a fetch failure; `fallback` is shown when the server gave no message.
    pub fn from_fetch(err: FetchError, fallback: &str) -> Self {
        match err {
            FetchError::Network(detail) => AppError::Network(detail),
            FetchError::Http { status, message } => AppError::Server {
                status,
                message: message.unwrap_or_else(|| fallback.to_string()),
            },
            FetchError::Parse(detail) => AppError::Parse(detail),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        AppError::from_fetch(err, GENERIC_FAILURE)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NoSession => AppError::AuthorizationMissing,
            other => AppError::Storage(other.to_string()),
        }
    }
}
