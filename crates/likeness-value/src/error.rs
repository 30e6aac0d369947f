use thiserror::Error;

/// Failure raised by an ordering capability.
///
/// Ordering implementations return this where a comparison cannot be made.
/// The equality dispatch treats it as "this strategy cannot decide"; the
/// equivalence engine reports it as the cause of a value mismatch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompareError {
    #[error("values of type {expected} and {actual} have no defined ordering")]
    Unordered {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("cannot compare a value of type {expected} with a value of type {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("{0}")]
    Custom(String),
}

impl CompareError {
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}
