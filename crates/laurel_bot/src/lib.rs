//! Laurel bot runtime.
//!
//! Loads [`LaurelConfig`], opens the level store, wires the leveling services
//! together and serves an HTTP health endpoint. The Discord front-end is
//! started by the `laurel` binary when built with the `discord` feature.

#![warn(missing_docs)]

mod api;
mod config;
mod runtime;

pub use api::create_router;
pub use config::{BotSettings, CooldownSettings, DatabaseSettings, LaurelConfig, ServerSettings};
pub use runtime::{Services, open_store, serve_health, spawn_cooldown_pruner};
