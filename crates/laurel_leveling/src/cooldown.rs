//! Per-member experience cooldowns.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CooldownKey {
    guild_id: String,
    user_id: String,
}

impl CooldownKey {
    fn new(guild_id: &str, user_id: &str) -> Self {
        Self {
            guild_id: guild_id.to_string(),
            user_id: user_id.to_string(),
        }
    }
}

/// Remembers when each member last earned experience.
///
/// State lives in memory only and starts empty, so a restart lets everyone
/// earn again immediately.
///
/// # Example
///
/// ```
/// use chrono::{Duration, Utc};
/// use laurel_leveling::CooldownTracker;
///
/// let tracker = CooldownTracker::new();
/// let now = Utc::now();
///
/// assert!(tracker.try_consume("guild", "user", 60, now));
/// assert!(!tracker.try_consume("guild", "user", 60, now + Duration::seconds(30)));
/// assert!(tracker.try_consume("guild", "user", 60, now + Duration::seconds(60)));
/// ```
#[derive(Debug, Default)]
pub struct CooldownTracker {
    entries: Mutex<HashMap<CooldownKey, DateTime<Utc>>>,
}

impl CooldownTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the award slot of a member at `now`.
    ///
    /// Returns `true` and records `now` when the member has no earlier award
    /// or at least `cooldown_seconds` have passed since it. Otherwise returns
    /// `false` and leaves the entry untouched. A cooldown of zero or less
    /// always allows.
    ///
    /// Check and record happen under one lock, so of two simultaneous calls
    /// for the same member at most one succeeds.
    #[tracing::instrument(skip(self, now), level = "trace")]
    pub fn try_consume(
        &self,
        guild_id: &str,
        user_id: &str,
        cooldown_seconds: i64,
        now: DateTime<Utc>,
    ) -> bool {
        let key = CooldownKey::new(guild_id, user_id);
        let mut entries = self.entries.lock();

        if cooldown_seconds > 0 {
            if let Some(last) = entries.get(&key) {
                let elapsed = now.signed_duration_since(*last);
                if elapsed < Duration::seconds(cooldown_seconds) {
                    tracing::trace!(elapsed_secs = elapsed.num_seconds(), "Still cooling down");
                    return false;
                }
            }
        }

        entries.insert(key, now);
        true
    }

    /// Remove entries whose last award is at least `older_than` before `now`.
    ///
    /// Returns the number of entries dropped.
    pub fn prune(&self, older_than: Duration, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, last| now.signed_duration_since(*last) < older_than);
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = entries.len(), "Pruned cooldown entries");
        }
        removed
    }

    /// Number of tracked members.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether no member is tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Forget every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp")
    }

    #[test]
    fn first_call_is_allowed() {
        let tracker = CooldownTracker::new();
        assert!(tracker.try_consume("g", "u", 60, t0()));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn denial_does_not_reset_window() {
        let tracker = CooldownTracker::new();
        assert!(tracker.try_consume("g", "u", 60, t0()));
        assert!(!tracker.try_consume("g", "u", 60, t0() + Duration::seconds(59)));
        // Window still measured from the first award
        assert!(tracker.try_consume("g", "u", 60, t0() + Duration::seconds(60)));
    }

    #[test]
    fn keys_are_independent() {
        let tracker = CooldownTracker::new();
        assert!(tracker.try_consume("g", "u", 60, t0()));
        assert!(tracker.try_consume("g", "v", 60, t0()));
        assert!(tracker.try_consume("h", "u", 60, t0()));
        assert_eq!(tracker.len(), 3);
    }

    #[test]
    fn zero_cooldown_always_allows() {
        let tracker = CooldownTracker::new();
        assert!(tracker.try_consume("g", "u", 0, t0()));
        assert!(tracker.try_consume("g", "u", 0, t0()));
        assert!(tracker.try_consume("g", "u", -5, t0()));
    }

    #[test]
    fn clock_going_backwards_is_denied() {
        let tracker = CooldownTracker::new();
        assert!(tracker.try_consume("g", "u", 60, t0()));
        assert!(!tracker.try_consume("g", "u", 60, t0() - Duration::seconds(10)));
    }

    #[test]
    fn prune_drops_only_stale_entries() {
        let tracker = CooldownTracker::new();
        tracker.try_consume("g", "old", 60, t0());
        tracker.try_consume("g", "new", 60, t0() + Duration::seconds(500));

        let removed = tracker.prune(Duration::seconds(600), t0() + Duration::seconds(700));

        assert_eq!(removed, 1);
        assert_eq!(tracker.len(), 1);
        assert!(!tracker.try_consume("g", "new", 60, t0() + Duration::seconds(510)));
        assert!(tracker.try_consume("g", "old", 60, t0() + Duration::seconds(701)));
    }

    #[test]
    fn clear_empties_tracker() {
        let tracker = CooldownTracker::new();
        tracker.try_consume("g", "u", 60, t0());
        assert!(!tracker.is_empty());
        tracker.clear();
        assert!(tracker.is_empty());
    }

    #[test]
    fn simultaneous_claims_have_one_winner() {
        let tracker = Arc::new(CooldownTracker::new());
        let now = t0();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let tracker = Arc::clone(&tracker);
                std::thread::spawn(move || tracker.try_consume("g", "u", 60, now))
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .filter(|won| *won)
            .count();

        assert_eq!(winners, 1);
    }
}
