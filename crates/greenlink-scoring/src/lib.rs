//! # greenlink-scoring: Pure Scoring Engines
//!
//! - **Feasibility** (`feasibility.rs`): maps device age and reported issue
//!   to a repair verdict of High, Medium or Critical.
//! - **Gamification** (`gamification.rs`): applies green-credit awards to a
//!   user's stats, advancing level and rank.
//!
//! Both engines are deterministic, total over their inputs, and free of
//! side effects. Callers decide what to do with a level-up signal.

pub mod feasibility;
pub mod gamification;

pub use feasibility::{assess, score, Feasibility, FeasibilityVerdict};
pub use gamification::{
    award_points, award_points_with, rank_for_level, Award, LevelUpPolicy, UserStats,
    LEVEL_STEP, REFERRAL_BONUS,
};
