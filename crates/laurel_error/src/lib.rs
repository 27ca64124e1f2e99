//! Error types for the Laurel leveling bot.
//!
//! This crate provides the foundation error types used throughout the Laurel workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use laurel_error::{LaurelResult, ValidationError, ValidationErrorKind};
//!
//! fn set_cooldown(seconds: i32) -> LaurelResult<i32> {
//!     if seconds > 600 {
//!         Err(ValidationError::new(ValidationErrorKind::OutOfRange {
//!             field: "xp_cooldown".to_string(),
//!             min: 0,
//!             max: 600,
//!             value: i64::from(seconds),
//!         }))?
//!     }
//!     Ok(seconds)
//! }
//!
//! assert!(set_cooldown(900).is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
mod dispatch;
mod error;
mod validation;

pub use config::ConfigError;
pub use database::{DatabaseError, DatabaseErrorKind};
pub use dispatch::{DispatchError, DispatchErrorKind};
pub use error::{LaurelError, LaurelErrorKind, LaurelResult};
pub use validation::{ValidationError, ValidationErrorKind};
