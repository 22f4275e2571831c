/// Classified failure of one backend call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// A response arrived but reported failure.
    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("request failed"))]
    Http { status: u16, message: Option<String> },

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    Parse(String),
}

impl FetchError {
    /// Server-supplied message, if the backend sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            FetchError::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
