use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures surfaced by collections and the repositories built on them.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A stored document lacks a field the entity requires.
    #[error("{entity} document is missing required field `{field}`")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    /// A stored field exists but holds a value of the wrong type or range.
    #[error("{entity} document has an invalid `{field}` field: {reason}")]
    InvalidField {
        entity: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Backend(#[from] mongodb::error::Error),
}

impl StoreError {
    /// True for data-integrity failures, as opposed to backend errors.
    pub fn is_integrity(&self) -> bool {
        matches!(
            self,
            StoreError::MissingField { .. } | StoreError::InvalidField { .. }
        )
    }
}
