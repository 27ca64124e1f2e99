//! Experience to level mapping.
//!
//! `level = 1 + floor(sqrt(xp / 100))`, so the thresholds grow quadratically:
//!
//! | level | minimum xp |
//! |-------|------------|
//! | 2     | 100        |
//! | 3     | 400        |
//! | 5     | 1600       |
//! | 10    | 8100       |

/// Experience divisor of the level curve.
pub const XP_PER_LEVEL_UNIT: i64 = 100;

/// Level reached with `experience` points.
///
/// Negative experience never occurs in stored records but clamps to level 1.
///
/// # Examples
///
/// ```
/// use laurel_core::level_for;
///
/// assert_eq!(level_for(0), 1);
/// assert_eq!(level_for(99), 1);
/// assert_eq!(level_for(100), 2);
/// assert_eq!(level_for(110), 2);
/// assert_eq!(level_for(400), 3);
/// assert_eq!(level_for(-5), 1);
/// ```
pub fn level_for(experience: i64) -> i32 {
    if experience < 0 {
        return 1;
    }
    // floor(sqrt(x / 100)) == isqrt(floor(x / 100)) for integers
    let steps = (experience / XP_PER_LEVEL_UNIT).isqrt();
    1 + steps as i32
}

/// Minimum experience needed to stand at `level`.
///
/// Saturates at `i64::MAX` for levels no experience total can reach.
///
/// # Examples
///
/// ```
/// use laurel_core::{experience_required_for, level_for};
///
/// assert_eq!(experience_required_for(1), 0);
/// assert_eq!(experience_required_for(2), 100);
/// assert_eq!(experience_required_for(10), 8100);
/// assert_eq!(level_for(experience_required_for(7)), 7);
/// ```
pub fn experience_required_for(level: i32) -> i64 {
    if level <= 1 {
        return 0;
    }
    let steps = i64::from(level - 1);
    steps
        .saturating_mul(steps)
        .saturating_mul(XP_PER_LEVEL_UNIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_is_at_least_one_and_non_decreasing() {
        let mut previous = level_for(0);
        assert_eq!(previous, 1);
        for xp in 1..=50_000 {
            let level = level_for(xp);
            assert!(level >= 1);
            assert!(level >= previous, "level dropped at {xp}");
            previous = level;
        }
    }

    #[test]
    fn threshold_never_exceeds_experience() {
        for xp in (0..=200_000).step_by(7) {
            assert!(experience_required_for(level_for(xp)) <= xp, "xp {xp}");
        }
    }

    #[test]
    fn threshold_maps_back_to_its_level() {
        for level in 1..=5_000 {
            assert_eq!(level_for(experience_required_for(level)), level);
        }
    }

    #[test]
    fn one_below_threshold_is_previous_level() {
        for level in 2..=500 {
            assert_eq!(level_for(experience_required_for(level) - 1), level - 1);
        }
    }

    #[test]
    fn huge_experience_does_not_overflow() {
        let level = level_for(i64::MAX);
        assert!(level > 300_000_000);
        assert!(experience_required_for(level) <= i64::MAX);
        assert_eq!(experience_required_for(i32::MAX), i64::MAX);
    }

    #[test]
    fn non_positive_levels_need_nothing() {
        assert_eq!(experience_required_for(0), 0);
        assert_eq!(experience_required_for(-3), 0);
    }
}
