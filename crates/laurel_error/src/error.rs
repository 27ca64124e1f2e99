//! Top-level error wrapper types.

use crate::{ConfigError, DatabaseError, DispatchError, ValidationError};

/// Every failure a Laurel operation can surface.
///
/// # Examples
///
/// ```
/// use laurel_error::{ConfigError, LaurelError};
///
/// let err: LaurelError = ConfigError::new("missing token").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum LaurelErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Persistence layer error
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Outbound side effect (message, role grant) failed
    #[from(DispatchError)]
    Dispatch(DispatchError),
    /// Admin input rejected before reaching the store
    #[from(ValidationError)]
    Validation(ValidationError),
}

/// Laurel error with kind discrimination.
///
/// # Examples
///
/// ```
/// use laurel_error::{LaurelErrorKind, LaurelResult, DatabaseError, DatabaseErrorKind};
///
/// fn might_fail() -> LaurelResult<()> {
///     Err(DatabaseError::new(DatabaseErrorKind::Query("locked".into())))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), LaurelErrorKind::Database(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Laurel Error: {}", _0)]
pub struct LaurelError(Box<LaurelErrorKind>);

impl LaurelError {
    /// Create a new error from a kind.
    pub fn new(kind: LaurelErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &LaurelErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to LaurelErrorKind
impl<T> From<T> for LaurelError
where
    T: Into<LaurelErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Laurel operations.
pub type LaurelResult<T> = std::result::Result<T, LaurelError>;
