//! Error types for the public interface of the library.
//!
//! Internally the crate uses `anyhow` (see `Res`). At the public boundary, errors are tagged with an
//! `ErrorType` so that the presentation layer can distinguish a bad form value from a missing
//! record or a failed write.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// The internal result type used throughout the crate.
pub(crate) type Res<T> = anyhow::Result<T>;

/// The public result type.
pub type Result<T> = std::result::Result<T, Error>;

/// The class of failure.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// A negative amount, a blank required field, a count below one, a value outside the
    /// configured choices, or a write against a month that has not been started.
    Validation,
    /// A delete or contribute referenced an ID that does not exist.
    NotFound,
    /// The SQLite database could not be read or written.
    Database,
    /// The home directory or the configuration file is missing or invalid.
    Config,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// The public error type. It wraps the underlying `anyhow::Error` and tags it with an `ErrorType`.
pub struct Error {
    error_type: ErrorType,
    inner: anyhow::Error,
}

impl Error {
    pub(crate) fn new(error_type: ErrorType, inner: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            inner: inner.into(),
        }
    }

    pub(crate) fn validation(message: impl Display) -> Self {
        Self::new(ErrorType::Validation, anyhow::anyhow!("{message}"))
    }

    pub(crate) fn not_found(message: impl Display) -> Self {
        Self::new(ErrorType::NotFound, anyhow::anyhow!("{message}"))
    }

    /// What kind of failure this is.
    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.inner)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#}", self.inner)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

/// Converts an internal result into the public `Result` by tagging the error with an `ErrorType`.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T> IntoResult<T> for Res<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}
