use thiserror::Error;

/// Failures of the persistent token store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid storage file contents: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Everything that can go wrong while adopting a token or talking to the API.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token malformed: expected 3 segments, found {segments}")]
    MalformedToken { segments: usize },

    #[error("token payload could not be decoded: {0}")]
    Decode(String),

    #[error("token expired at {exp} (now {now})")]
    ExpiredToken { exp: i64, now: i64 },

    #[error("request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// True for the errors that mean the token itself is unusable.
    pub fn is_token_error(&self) -> bool {
        matches!(
            self,
            AuthError::MalformedToken { .. } | AuthError::Decode(_) | AuthError::ExpiredToken { .. }
        )
    }
}
