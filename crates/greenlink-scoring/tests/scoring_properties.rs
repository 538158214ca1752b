//! Property tests for the scoring engines.

use greenlink_scoring::{
    award_points, award_points_with, score, FeasibilityVerdict, LevelUpPolicy, UserStats, LEVEL_STEP,
};
use proptest::prelude::*;

fn arb_stats() -> impl Strategy<Value = UserStats> {
    (1u32..20, 0u64..50_000).prop_map(|(level, points)| {
        let next_level_at = points + 1 + (points % LEVEL_STEP);
        UserStats {
            points,
            level,
            rank: "Eco-Protector".to_string(),
            next_level_at,
        }
    })
}

proptest! {
    #[test]
    fn feasibility_is_total(age in any::<u32>(), issue in ".{0,64}") {
        let f = score(age, &issue);
        prop_assert!(f.score >= 1 && f.score <= 6);
        let expected = if f.score >= 5 {
            FeasibilityVerdict::High
        } else if f.score >= 4 {
            FeasibilityVerdict::Medium
        } else {
            FeasibilityVerdict::Critical
        };
        prop_assert_eq!(f.verdict, expected);
    }

    #[test]
    fn feasibility_is_deterministic(age in 0u32..30, issue in "[a-z_ ]{0,32}") {
        prop_assert_eq!(score(age, &issue), score(age, &issue));
    }

    #[test]
    fn points_never_decrease(stats in arb_stats(), amount in 0u64..5_000) {
        let award = award_points(&stats, amount);
        prop_assert_eq!(award.stats.points, stats.points + amount);
        prop_assert!(award.stats.level >= stats.level);
        prop_assert!(award.levels_gained <= 1);
        prop_assert_eq!(award.stats.level, stats.level + award.levels_gained);
        prop_assert_eq!(
            award.stats.next_level_at,
            stats.next_level_at + LEVEL_STEP * u64::from(award.levels_gained)
        );
    }

    #[test]
    fn cascade_leaves_points_below_threshold(stats in arb_stats(), amount in 0u64..20_000) {
        let award = award_points_with(&stats, amount, LevelUpPolicy::Cascade);
        prop_assert!(award.stats.points < award.stats.next_level_at);
    }
}
