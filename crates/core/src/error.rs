/// Domain-level error shared by every crate in the workspace.
///
/// `NotFound` deliberately carries only the entity kind: a record owned by
/// someone else is reported exactly like a record that does not exist.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} Does Not Exist")]
    NotFound { entity: &'static str },

    #[error("Invalid Data: {0}")]
    InvalidData(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::NotFound`] on the given entity kind.
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }
}
