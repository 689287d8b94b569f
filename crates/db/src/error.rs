use gigboard_core::error::CoreError;

/// Failure of a multi-row transactional operation.
///
/// Either a domain rule rejected the operation once the rows were locked, or
/// the database itself failed. In both cases the transaction is rolled back
/// when it is dropped.
#[derive(Debug, thiserror::Error)]
pub enum CascadeError {
    #[error(transparent)]
    Rule(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CascadeError {
    /// The domain error, if this failure came from a rule check.
    pub fn as_rule(&self) -> Option<&CoreError> {
        match self {
            CascadeError::Rule(err) => Some(err),
            CascadeError::Database(_) => None,
        }
    }
}
