//! Green-credit invariants over arbitrary award sequences.

use std::sync::Arc;

use greenlink_scoring::{award_points_with, LevelUpPolicy, UserStats, LEVEL_STEP, REFERRAL_BONUS};
use greenlink_sim::{ConsumerDesk, SimConfig};
use proptest::prelude::*;

proptest! {
    #[test]
    fn referrals_accumulate_and_stay_below_threshold(n in 0usize..60) {
        let desk = ConsumerDesk::new(Arc::new(SimConfig::default()));
        let start = desk.stats();
        let mut ups = 0;
        for _ in 0..n {
            if desk.refer_friend().leveled_up {
                ups += 1;
            }
        }
        let end = desk.stats();
        prop_assert_eq!(end.points, start.points + REFERRAL_BONUS * n as u64);
        prop_assert_eq!(end.level, start.level + ups);
        prop_assert!(end.points < end.next_level_at);
    }

    #[test]
    fn cascade_never_trails_single(
        points in 0u64..10_000,
        amounts in proptest::collection::vec(0u64..5_000, 1..8),
    ) {
        let base = UserStats { points, next_level_at: (points / LEVEL_STEP + 1) * LEVEL_STEP, ..UserStats::new() };
        let mut single = base.clone();
        let mut cascade = base;
        for amount in amounts {
            let s = award_points_with(&single, amount, LevelUpPolicy::Single);
            let c = award_points_with(&cascade, amount, LevelUpPolicy::Cascade);
            prop_assert!(s.stats.points >= single.points);
            prop_assert!(s.levels_gained <= 1);
            prop_assert!(c.stats.points < c.stats.next_level_at);
            single = s.stats;
            cascade = c.stats;
        }
        prop_assert!(cascade.level >= single.level);
        prop_assert_eq!(cascade.points, single.points);
    }
}
