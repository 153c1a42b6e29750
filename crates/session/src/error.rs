use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("no user is signed in")]
    NotSignedIn,

    #[error("identity provider error: {0}")]
    Provider(String),

    #[error("session has been torn down")]
    TornDown,
}

impl SessionError {
    pub(crate) fn provider(err: anyhow::Error) -> Self {
        SessionError::Provider(format!("{err:#}"))
    }
}
