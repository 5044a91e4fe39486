use action_bank_core::error::CoreError;

/// Failure signalled by a storage backend.
///
/// Resolvers translate these into [`CoreError`] explicitly; none of them is
/// ever shown to a caller verbatim.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("{entity} Does Not Exist")]
    DoesNotExist { entity: &'static str },

    #[error("Invalid Data: {0}")]
    InvalidData(String),

    #[error("Username already exists")]
    UsernameExists,

    #[error("Email already exists")]
    EmailExists,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RepoError {
    pub fn does_not_exist(entity: &'static str) -> Self {
        Self::DoesNotExist { entity }
    }
}

impl From<CoreError> for RepoError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidData(msg) => Self::InvalidData(msg),
            other => Self::InvalidData(other.to_string()),
        }
    }
}
