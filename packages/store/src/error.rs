use std::path::PathBuf;

/// Failures raised by a [`crate::KeyValueStore`] or the session layer on top of it.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access `{key}` at {}: {source}", path.display())]
    Io {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode cached user: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("no active session")]
    NoSession,
}
