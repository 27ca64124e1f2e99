//! Errors raised while parsing chat commands.

use derive_more::{Display, Error};

/// Result type for command parsing.
pub type CommandResult<T> = Result<T, CommandError>;

/// Specific command parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum CommandErrorKind {
    /// Missing required argument.
    #[display("Missing required argument '{}' for command '{}'", arg_name, command)]
    MissingArgument {
        /// Command being parsed
        command: String,
        /// Argument that was absent
        arg_name: String,
    },

    /// Argument present but unusable.
    #[display("Invalid argument '{}' for command '{}': {}", arg_name, command, reason)]
    InvalidArgument {
        /// Command being parsed
        command: String,
        /// Offending argument
        arg_name: String,
        /// What was wrong with it
        reason: String,
    },
}

/// Command error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Command Error: {} at line {} in {}", kind, line, file)]
pub struct CommandError {
    /// The kind of error that occurred
    pub kind: CommandErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl CommandError {
    /// Create a new CommandError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CommandErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    #[track_caller]
    pub(crate) fn missing(command: &str, arg_name: &str) -> Self {
        Self::new(CommandErrorKind::MissingArgument {
            command: command.to_string(),
            arg_name: arg_name.to_string(),
        })
    }

    #[track_caller]
    pub(crate) fn invalid(command: &str, arg_name: &str, reason: impl Into<String>) -> Self {
        Self::new(CommandErrorKind::InvalidArgument {
            command: command.to_string(),
            arg_name: arg_name.to_string(),
            reason: reason.into(),
        })
    }
}
