//! Discord-specific error types.

use derive_getters::Getters;
use laurel_error::{DispatchError, DispatchErrorKind};

/// Discord error variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum DiscordErrorKind {
    /// Serenity API error (e.g., HTTP error, gateway error, rate limit).
    #[display("Serenity API error: {_0}")]
    SerenityError(String),

    /// Channel, role, member or user does not exist.
    #[display("Not found: {_0}")]
    NotFound(String),

    /// Bot lacks required permissions for an operation.
    #[display("Insufficient permissions: {_0}")]
    InsufficientPermissions(String),

    /// Invalid Discord snowflake ID format.
    #[display("Invalid ID: {_0}")]
    InvalidId(String),

    /// Connection to Discord gateway failed.
    #[display("Connection failed: {_0}")]
    ConnectionFailed(String),
}

/// Discord error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, Getters)]
#[display("Discord Error: {} at line {} in {}", kind, line, file)]
pub struct DiscordError {
    /// The kind of error that occurred
    kind: DiscordErrorKind,
    /// Line number where error was created
    line: u32,
    /// File where error was created
    file: &'static str,
}

impl DiscordError {
    /// Create a new DiscordError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DiscordErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for Discord operations.
pub type DiscordResult<T> = Result<T, DiscordError>;

impl From<serenity::Error> for DiscordError {
    #[track_caller]
    fn from(err: serenity::Error) -> Self {
        let status = match &err {
            serenity::Error::Http(http) => http.status_code().map(|s| s.as_u16()),
            _ => None,
        };
        let kind = match status {
            Some(403) => DiscordErrorKind::InsufficientPermissions(err.to_string()),
            Some(404) => DiscordErrorKind::NotFound(err.to_string()),
            _ => DiscordErrorKind::SerenityError(err.to_string()),
        };
        DiscordError::new(kind)
    }
}

impl From<DiscordError> for DispatchError {
    #[track_caller]
    fn from(err: DiscordError) -> Self {
        let kind = match err.kind {
            DiscordErrorKind::InsufficientPermissions(msg) => DispatchErrorKind::PermissionDenied(msg),
            DiscordErrorKind::NotFound(msg) => DispatchErrorKind::TargetNotFound(msg),
            DiscordErrorKind::InvalidId(msg) => DispatchErrorKind::InvalidId(msg),
            DiscordErrorKind::SerenityError(msg) | DiscordErrorKind::ConnectionFailed(msg) => {
                DispatchErrorKind::Platform(msg)
            }
        };
        DispatchError::new(kind)
    }
}
