//! XP accumulation and level progression.
//!
//! Levels are open-ended; each level requires `XP_BASE_PER_LEVEL * level`
//! XP, and titles come from a fixed threshold table.

use serde::{Deserialize, Serialize};

use crate::constants::XP_BASE_PER_LEVEL;

/// Title thresholds, checked in order. A level below the bound earns the title.
const TITLE_TABLE: &[(u32, &str)] = &[
    (5, "Rookie"),
    (10, "Rising Star"),
    (15, "Pro"),
    (20, "Elite"),
    (30, "Master"),
    (40, "Legend"),
];

const TOP_TITLE: &str = "Icon";

/// Current level standing for a creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLevel {
    pub level: u32,
    /// XP earned toward the next level; always below `xp_to_next`.
    pub xp: i64,
    pub xp_to_next: i64,
    pub title: String,
}

impl Default for UserLevel {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            xp_to_next: xp_threshold(1),
            title: title_for_level(1).to_string(),
        }
    }
}

/// XP required to clear the given level.
#[must_use]
pub const fn xp_threshold(level: u32) -> i64 {
    XP_BASE_PER_LEVEL * level as i64
}

/// Look up the display title for a level.
#[must_use]
pub fn title_for_level(level: u32) -> &'static str {
    for (bound, title) in TITLE_TABLE {
        if level < *bound {
            return title;
        }
    }
    TOP_TITLE
}

/// Result of an XP award.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelUp {
    pub levels_gained: u32,
    pub level: u32,
}

/// Add XP, carrying overflow across as many level-ups as the award covers.
/// Non-positive awards leave the record untouched.
pub fn apply_xp(user: &mut UserLevel, amount: i64) -> LevelUp {
    if amount <= 0 {
        return LevelUp {
            levels_gained: 0,
            level: user.level,
        };
    }

    user.xp += amount;
    let mut gained = 0u32;
    while user.xp >= user.xp_to_next {
        user.xp -= user.xp_to_next;
        user.level += 1;
        user.xp_to_next = xp_threshold(user.level);
        gained += 1;
    }

    if gained > 0 {
        user.title = title_for_level(user.level).to_string();
    }

    LevelUp {
        levels_gained: gained,
        level: user.level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_award_crosses_multiple_levels() {
        let mut user = UserLevel::default();
        // Levels 1..=3 cost 1000 + 2000 + 3000; land partway into level 4.
        let up = apply_xp(&mut user, 6_500);
        assert_eq!(up.levels_gained, 3);
        assert_eq!(user.level, 4);
        assert_eq!(user.xp, 500);
        assert_eq!(user.xp_to_next, 4_000);
        assert!(user.xp < user.xp_to_next);
    }

    #[test]
    fn exact_threshold_rolls_over_to_zero() {
        let mut user = UserLevel::default();
        apply_xp(&mut user, 1_000);
        assert_eq!(user.level, 2);
        assert_eq!(user.xp, 0);
    }

    #[test]
    fn non_positive_awards_are_ignored() {
        let mut user = UserLevel::default();
        let up = apply_xp(&mut user, 0);
        assert_eq!(up.levels_gained, 0);
        assert_eq!(user.xp, 0);
        apply_xp(&mut user, -50);
        assert_eq!(user.xp, 0);
    }

    #[test]
    fn titles_follow_threshold_table() {
        assert_eq!(title_for_level(1), "Rookie");
        assert_eq!(title_for_level(4), "Rookie");
        assert_eq!(title_for_level(5), "Rising Star");
        assert_eq!(title_for_level(19), "Elite");
        assert_eq!(title_for_level(39), "Legend");
        assert_eq!(title_for_level(40), "Icon");
        assert_eq!(title_for_level(120), "Icon");
    }
}
