//! Trait definitions for the Laurel leveling bot.
//!
//! This crate provides the seams between the leveling core and its
//! collaborators: the persistence store and the chat front-end that carries
//! out outbound actions.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{ActionSink, LevelStore};
