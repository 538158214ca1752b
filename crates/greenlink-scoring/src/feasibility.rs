//! # Repair Feasibility
//!
//! ```text
//! score = age_points(age) + issue_points(issue)
//!
//! age ≤ 2 → 3    age ≤ 4 → 2    otherwise → 1
//! high-repairability keyword → +3
//! medium keyword             → +2
//! severe-damage keyword      → +1
//! no match                   → +0
//!
//! score ≥ 5 → High    score ≥ 4 → Medium    otherwise → Critical
//! ```
//!
//! Keyword sets are tested in order and only the first matching set counts.
//! Matching is a case-insensitive substring test against the issue text,
//! which arrives in `snake_case` form from the intake form (`screen_crack`).

use serde::{Deserialize, Serialize};

/// Issues a regional hub fixes with stocked parts.
pub const HIGH_REPAIR_KEYWORDS: &[&str] = &[
    "software",
    "battery_drain",
    "port",
    "speaker",
    "os_lag",
    "mic",
    "camera",
    "button",
    "firmware",
    "keyboard",
];

/// Issues that need a hardware diagnostic at an L3 node.
pub const MEDIUM_REPAIR_KEYWORDS: &[&str] = &[
    "screen_crack",
    "backlight",
    "pixels",
    "hinge",
    "touch_unresponsive",
    "overheating",
    "audio_jack",
];

/// Severe damage, usually routed to material recovery.
pub const LOW_REPAIR_KEYWORDS: &[&str] = &[
    "liquid",
    "motherboard",
    "boot_loop",
    "eol",
    "no_power",
    "swollen",
    "logic_board",
    "internal_short",
];

/// Repair feasibility verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeasibilityVerdict {
    High,
    Medium,
    Critical,
}

impl FeasibilityVerdict {
    /// Fixed advisory shown alongside the verdict.
    pub fn advisory(&self) -> &'static str {
        match self {
            Self::High => "Highly repairable. Parts are readily available in our regional distribution centers.",
            Self::Medium => "Likely repairable. Requires professional hardware diagnostic at an L3 Node.",
            Self::Critical => "Complex damage detected. Repair may not be cost-effective. We recommend formal EOL material recovery.",
        }
    }

    fn from_score(score: u8) -> Self {
        if score >= 5 {
            Self::High
        } else if score >= 4 {
            Self::Medium
        } else {
            Self::Critical
        }
    }
}

impl std::fmt::Display for FeasibilityVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Critical => "Critical",
        };
        f.write_str(s)
    }
}

/// A scored feasibility assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feasibility {
    pub verdict: FeasibilityVerdict,
    pub score: u8,
    pub advisory: String,
}

/// Points contributed by device age in years.
pub fn age_points(age_years: u32) -> u8 {
    match age_years {
        0..=2 => 3,
        3..=4 => 2,
        _ => 1,
    }
}

/// Points contributed by the reported issue.
pub fn issue_points(issue: &str) -> u8 {
    let issue = issue.to_lowercase();
    let hit = |set: &[&str]| set.iter().any(|k| issue.contains(k));
    if hit(HIGH_REPAIR_KEYWORDS) {
        3
    } else if hit(MEDIUM_REPAIR_KEYWORDS) {
        2
    } else if hit(LOW_REPAIR_KEYWORDS) {
        1
    } else {
        0
    }
}

/// Score a device. Total over all inputs.
pub fn score(age_years: u32, issue: &str) -> Feasibility {
    let score = age_points(age_years) + issue_points(issue);
    let verdict = FeasibilityVerdict::from_score(score);
    Feasibility {
        verdict,
        score,
        advisory: verdict.advisory().to_string(),
    }
}

/// Score raw intake form fields.
///
/// Returns `None` while the model name, age or condition is still empty.
/// The age is read from its leading digits; text with none counts as zero.
pub fn assess(device_type: &str, age: &str, condition: &str) -> Option<Feasibility> {
    if device_type.trim().is_empty() || age.trim().is_empty() || condition.trim().is_empty() {
        return None;
    }
    Some(score(leading_years(age), condition))
}

fn leading_years(age: &str) -> u32 {
    let digits: String = age.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn young_device_with_software_issue_is_high() {
        let f = score(1, "software");
        assert_eq!(f.score, 6);
        assert_eq!(f.verdict, FeasibilityVerdict::High);
    }

    #[test]
    fn old_device_with_liquid_damage_is_critical() {
        let f = score(6, "liquid");
        assert_eq!(f.score, 2);
        assert_eq!(f.verdict, FeasibilityVerdict::Critical);
    }

    #[test]
    fn mid_age_screen_crack_is_medium() {
        let f = score(3, "screen_crack");
        assert_eq!(f.score, 4);
        assert_eq!(f.verdict, FeasibilityVerdict::Medium);
    }

    #[test]
    fn first_matching_set_wins() {
        // "port" (high) and "liquid" (low) both match; high is tested first.
        assert_eq!(issue_points("liquid near charging port"), 3);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(issue_points("FIRMWARE corruption"), 3);
        assert_eq!(issue_points("Swollen battery"), 1);
    }

    #[test]
    fn unknown_issue_scores_zero() {
        assert_eq!(issue_points("mystery rattle"), 0);
        assert_eq!(score(0, "mystery rattle").verdict, FeasibilityVerdict::Critical);
    }

    #[test]
    fn age_brackets() {
        assert_eq!(age_points(0), 3);
        assert_eq!(age_points(2), 3);
        assert_eq!(age_points(3), 2);
        assert_eq!(age_points(4), 2);
        assert_eq!(age_points(5), 1);
        assert_eq!(age_points(u32::MAX), 1);
    }

    #[test]
    fn incomplete_intake_has_no_verdict() {
        assert!(assess("", "2", "software").is_none());
        assert!(assess("Pixel 7", "", "software").is_none());
        assert!(assess("Pixel 7", "2", "  ").is_none());
    }

    #[test]
    fn intake_age_parses_leading_digits() {
        let f = assess("Pixel 7", "2 years", "battery_drain").unwrap();
        assert_eq!(f.score, 6);
        let f = assess("Pixel 7", "unknown", "battery_drain").unwrap();
        assert_eq!(f.score, 6);
    }

    #[test]
    fn advisory_matches_verdict() {
        let f = score(1, "camera");
        assert_eq!(f.advisory, FeasibilityVerdict::High.advisory());
    }
}
