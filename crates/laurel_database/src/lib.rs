//! SQLite persistence for Laurel.
//!
//! This crate provides the Diesel schema, row models and the
//! [`SqliteLevelStore`] implementation of [`laurel_interface::LevelStore`].
//!
//! # Example
//!
//! ```rust,ignore
//! use laurel_database::SqliteLevelStore;
//!
//! let store = SqliteLevelStore::open("data/laurel.db")?;
//! ```

mod connection;
mod level_store;
mod models;

// Public modules for external access
pub mod schema;

pub use connection::{establish_connection, run_migrations};
pub use level_store::SqliteLevelStore;
pub use models::{
    GuildSettingsChangeset, GuildSettingsRow, LevelRewardRow, NewLevelRewardRow, NewUserLevelRow,
    NewWelcomeLogRow, UserLevelRow,
};

use laurel_error::DatabaseError;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
