//! # Green-Credit Progression
//!
//! Points only ever increase. When an award carries points to or past
//! `next_level_at`, the level rises by one and the threshold moves up by
//! [`LEVEL_STEP`]. Rank is looked up from the new level:
//!
//! ```text
//! level ≥ 10 → "Eco-Master"
//! level ≥ 5  → "Earth Guardian"
//! otherwise  → rank unchanged
//! ```
//!
//! Under [`LevelUpPolicy::Single`] an award levels up at most once, even
//! when it crosses several thresholds. [`LevelUpPolicy::Cascade`] keeps
//! levelling until points fall below the threshold.

use serde::{Deserialize, Serialize};

/// Threshold increment applied on every level-up.
pub const LEVEL_STEP: u64 = 1000;

/// Points for referring another citizen.
pub const REFERRAL_BONUS: u64 = 50;

/// Rank held before the tiered ranks kick in.
pub const STARTING_RANK: &str = "Eco-Protector";

/// How many level-ups one award may trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelUpPolicy {
    /// At most one level per award.
    #[default]
    Single,
    /// As many levels as the new point total covers.
    Cascade,
}

/// A user's gamification standing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub points: u64,
    pub level: u32,
    pub rank: String,
    pub next_level_at: u64,
}

impl UserStats {
    /// Fresh stats for a new participant.
    pub fn new() -> Self {
        Self {
            points: 0,
            level: 1,
            rank: STARTING_RANK.to_string(),
            next_level_at: LEVEL_STEP,
        }
    }

    /// Fraction of the way to the next threshold, clamped to `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.next_level_at == 0 {
            return 1.0;
        }
        (self.points as f64 / self.next_level_at as f64).clamp(0.0, 1.0)
    }

    /// Title of the next rank tier the user is working towards.
    pub fn next_rank_title(&self) -> &'static str {
        if self.level >= 5 {
            "Eco-Master"
        } else {
            "Earth Guardian"
        }
    }
}

impl Default for UserStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of an award.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Award {
    pub stats: UserStats,
    /// Whether the caller should raise a level-up notification.
    pub leveled_up: bool,
    pub levels_gained: u32,
}

/// Rank for `level`, keeping `prior` below the first tier.
pub fn rank_for_level(level: u32, prior: &str) -> String {
    if level >= 10 {
        "Eco-Master".to_string()
    } else if level >= 5 {
        "Earth Guardian".to_string()
    } else {
        prior.to_string()
    }
}

/// Award points with at most one level-up.
pub fn award_points(stats: &UserStats, amount: u64) -> Award {
    award_points_with(stats, amount, LevelUpPolicy::Single)
}

/// Award points under an explicit level-up policy.
///
/// Levels saturate at `u32::MAX`; points and thresholds saturate at
/// `u64::MAX`.
pub fn award_points_with(stats: &UserStats, amount: u64, policy: LevelUpPolicy) -> Award {
    let mut next = stats.clone();
    next.points = stats.points.saturating_add(amount);

    let crossed = if next.points < next.next_level_at {
        0
    } else {
        match policy {
            LevelUpPolicy::Single => 1,
            LevelUpPolicy::Cascade => (next.points - next.next_level_at) / LEVEL_STEP + 1,
        }
    };
    let headroom = u32::MAX - stats.level;
    let levels_gained = u32::try_from(crossed).unwrap_or(u32::MAX).min(headroom);

    if levels_gained > 0 {
        next.level += levels_gained;
        next.next_level_at = next
            .next_level_at
            .saturating_add(LEVEL_STEP.saturating_mul(u64::from(levels_gained)));
        next.rank = rank_for_level(next.level, &stats.rank);
    }

    Award {
        stats: next,
        leveled_up: levels_gained > 0,
        levels_gained,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(points: u64, level: u32, next_level_at: u64) -> UserStats {
        UserStats {
            points,
            level,
            rank: STARTING_RANK.to_string(),
            next_level_at,
        }
    }

    #[test]
    fn crossing_threshold_levels_up_to_earth_guardian() {
        let award = award_points(&stats(1850, 4, 2000), 150);
        assert!(award.leveled_up);
        assert_eq!(award.stats.points, 2000);
        assert_eq!(award.stats.level, 5);
        assert_eq!(award.stats.next_level_at, 3000);
        assert_eq!(award.stats.rank, "Earth Guardian");
    }

    #[test]
    fn below_threshold_keeps_level_and_rank() {
        let award = award_points(&stats(1000, 4, 2000), 150);
        assert!(!award.leveled_up);
        assert_eq!(award.stats.points, 1150);
        assert_eq!(award.stats.level, 4);
        assert_eq!(award.stats.rank, STARTING_RANK);
    }

    #[test]
    fn low_level_up_keeps_prior_rank() {
        let award = award_points(&stats(950, 1, 1000), 50);
        assert!(award.leveled_up);
        assert_eq!(award.stats.level, 2);
        assert_eq!(award.stats.rank, STARTING_RANK);
    }

    #[test]
    fn level_ten_is_eco_master() {
        let award = award_points(&stats(9990, 9, 10000), 10);
        assert_eq!(award.stats.level, 10);
        assert_eq!(award.stats.rank, "Eco-Master");
    }

    #[test]
    fn single_policy_levels_once_even_across_thresholds() {
        let award = award_points(&stats(1850, 4, 2000), 2500);
        assert_eq!(award.levels_gained, 1);
        assert_eq!(award.stats.level, 5);
        assert_eq!(award.stats.next_level_at, 3000);
        assert!(award.stats.points >= award.stats.next_level_at);
    }

    #[test]
    fn cascade_policy_levels_until_below_threshold() {
        let award = award_points_with(&stats(1850, 4, 2000), 2500, LevelUpPolicy::Cascade);
        assert_eq!(award.stats.points, 4350);
        assert_eq!(award.levels_gained, 3);
        assert_eq!(award.stats.level, 7);
        assert_eq!(award.stats.next_level_at, 5000);
        assert_eq!(award.stats.rank, "Earth Guardian");
    }

    #[test]
    fn level_saturates_at_max() {
        let award = award_points(&stats(1999, u32::MAX, 2000), 1);
        assert!(!award.leveled_up);
        assert_eq!(award.stats.level, u32::MAX);
        assert_eq!(award.stats.points, 2000);
        assert_eq!(award.stats.next_level_at, 2000);
    }

    #[test]
    fn huge_cascade_award_is_computed_not_iterated() {
        let award = award_points_with(&UserStats::new(), 3_000_000_000_000, LevelUpPolicy::Cascade);
        assert_eq!(award.levels_gained, 3_000_000_000);
        assert_eq!(award.stats.level, 3_000_000_001);
        assert!(award.stats.points < award.stats.next_level_at);

        let capped = award_points_with(&UserStats::new(), 5_000_000_000_000, LevelUpPolicy::Cascade);
        assert_eq!(capped.stats.level, u32::MAX);
        assert_eq!(capped.levels_gained, u32::MAX - 1);
    }

    #[test]
    fn cascade_clamps_to_level_headroom() {
        let award = award_points_with(&stats(0, u32::MAX - 2, 1000), u64::MAX, LevelUpPolicy::Cascade);
        assert_eq!(award.levels_gained, 2);
        assert_eq!(award.stats.level, u32::MAX);
        assert_eq!(award.stats.points, u64::MAX);
        assert_eq!(award.stats.rank, "Eco-Master");
    }

    #[test]
    fn zero_award_is_a_no_op() {
        let s = stats(10, 1, 1000);
        let award = award_points(&s, 0);
        assert_eq!(award.stats, s);
        assert!(!award.leveled_up);
    }

    #[test]
    fn progress_and_next_title() {
        let s = stats(1850, 4, 2000);
        assert!((s.progress() - 0.925).abs() < 1e-9);
        assert_eq!(s.next_rank_title(), "Earth Guardian");
        assert_eq!(stats(0, 5, 5000).next_rank_title(), "Eco-Master");
    }

    #[test]
    fn stats_serialize_camel_case() {
        let json = serde_json::to_value(stats(1850, 4, 2000)).unwrap();
        assert_eq!(json["nextLevelAt"], 2000);
    }
}
