//! Progress of a member toward the next level.

use crate::experience_required_for;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Where a member stands inside their current level.
///
/// # Examples
///
/// ```
/// use laurel_core::LevelProgress;
///
/// // Level 2 spans 100..400 xp
/// let progress = LevelProgress::new(2, 250);
/// assert_eq!(*progress.gained(), 150);
/// assert_eq!(*progress.span(), 300);
/// assert_eq!(progress.percent(), 50.0);
/// assert_eq!(progress.filled_cells(20), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct LevelProgress {
    /// Current level
    level: i32,
    /// Total experience
    xp: i64,
    /// Threshold of the current level
    current_level_xp: i64,
    /// Threshold of the next level
    next_level_xp: i64,
    /// Experience earned since reaching the current level
    gained: i64,
    /// Experience between the two thresholds
    span: i64,
}

impl LevelProgress {
    /// Progress of a member at `level` holding `xp`.
    pub fn new(level: i32, xp: i64) -> Self {
        let current_level_xp = experience_required_for(level);
        let next_level_xp = experience_required_for(level.saturating_add(1));
        Self {
            level,
            xp,
            current_level_xp,
            next_level_xp,
            gained: xp - current_level_xp,
            span: next_level_xp - current_level_xp,
        }
    }

    /// Experience still missing for the next level.
    pub fn remaining(&self) -> i64 {
        (self.next_level_xp - self.xp).max(0)
    }

    /// Percent of the current level completed, in `0.0..=100.0`.
    pub fn percent(&self) -> f64 {
        if self.span <= 0 {
            return 100.0;
        }
        (self.gained as f64 / self.span as f64 * 100.0).clamp(0.0, 100.0)
    }

    /// How many of `cells` a progress bar should fill.
    pub fn filled_cells(&self, cells: usize) -> usize {
        ((cells as f64 * self.percent() / 100.0) as usize).min(cells)
    }
}
