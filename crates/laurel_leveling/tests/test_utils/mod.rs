//! Test utilities for Laurel leveling tests.
//!
//! Provides a recording action sink and a manually driven clock.

pub mod mock_sink;

#[allow(unused_imports)]
pub use mock_sink::{Action, FixedClock, RecordingSink};

use laurel_database::SqliteLevelStore;
use laurel_interface::LevelStore;
use std::sync::Arc;

/// Fresh in-memory store behind the trait object the services expect.
#[allow(dead_code)]
pub fn memory_store() -> Arc<dyn LevelStore> {
    Arc::new(SqliteLevelStore::in_memory().expect("in-memory store"))
}
