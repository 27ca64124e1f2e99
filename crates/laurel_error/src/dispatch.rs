//! Errors raised by outbound side effects.

/// Why a message send or role grant did not happen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum DispatchErrorKind {
    /// The bot lacks the permission for the action.
    #[display("Insufficient permissions: {}", _0)]
    PermissionDenied(String),
    /// Target channel, role or user no longer exists.
    #[display("Target not found: {}", _0)]
    TargetNotFound(String),
    /// Platform transport or API failure.
    #[display("Platform error: {}", _0)]
    Platform(String),
    /// An identifier could not be parsed for the platform.
    #[display("Invalid ID: {}", _0)]
    InvalidId(String),
}

/// Dispatch error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Dispatch Error: {} at line {} in {}", kind, line, file)]
pub struct DispatchError {
    /// The kind of error that occurred
    pub kind: DispatchErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl DispatchError {
    /// Create a new DispatchError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DispatchErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
