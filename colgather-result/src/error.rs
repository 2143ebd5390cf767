use std::fmt;
use thiserror::Error;

/// Unified error type for all colgather operations.
///
/// Collection is a single pass over caller-supplied chunks, so every variant is
/// terminal for the column being materialized: the caller surfaces it to its own
/// caller (e.g. aborts the summarise or bind that requested the column).
#[derive(Error, Debug)]
pub enum Error {
    /// A chunk is neither compatible with the current collecter nor eligible for
    /// promotion to a wider one.
    ///
    /// `expected` names the collecter kind, `found` describes the offending chunk.
    #[error("incompatible type: cannot collect {found} into a {expected} column")]
    IncompatibleType { expected: String, found: String },

    /// An unlabeled integer chunk was presented to a factor collecter and one of its
    /// values does not reference an already established level.
    ///
    /// No level is ever invented from a bare integer.
    #[error("cannot coerce integer vector to factor: {0}")]
    FactorCoercion(String),

    /// The factory was handed a model whose runtime type has no collecter.
    ///
    /// Raised before any destination buffer is allocated.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// Invalid input to a colgather API.
    ///
    /// Covers slicing indices that do not match their chunk, positions outside the
    /// destination, positions written twice and factor codes outside their levels.
    #[error("Invalid argument: {0}")]
    InvalidArgumentError(String),

    /// Arrow library error while converting to or from Arrow arrays.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Internal error indicating a bug or unexpected state.
    #[error("An internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Build an [`Error::IncompatibleType`] from anything displayable.
    ///
    /// ```
    /// use colgather_result::Error;
    ///
    /// let err = Error::incompatible("integer", "string vector");
    /// assert!(matches!(err, Error::IncompatibleType { .. }));
    /// assert!(err.to_string().contains("string vector"));
    /// ```
    #[inline]
    pub fn incompatible(expected: impl fmt::Display, found: impl fmt::Display) -> Self {
        Error::IncompatibleType {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Build an [`Error::UnsupportedType`] from anything displayable.
    #[inline]
    pub fn unsupported<E: fmt::Display>(what: E) -> Self {
        Error::UnsupportedType(what.to_string())
    }
}
