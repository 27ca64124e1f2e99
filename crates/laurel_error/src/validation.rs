//! Admin input validation errors.

/// Invalid admin input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ValidationErrorKind {
    /// Numeric setting outside its accepted bounds.
    #[display("{} must be between {} and {} (got {})", field, min, max, value)]
    OutOfRange {
        /// Setting name
        field: String,
        /// Inclusive lower bound
        min: i64,
        /// Inclusive upper bound
        max: i64,
        /// Rejected value
        value: i64,
    },
    /// Caller lacks administrator rights for the command.
    #[display("Administrator permission required for '{}'", _0)]
    PermissionRequired(String),
}

/// Validation error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The kind of error that occurred
    pub kind: ValidationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
