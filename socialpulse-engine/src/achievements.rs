//! Achievement catalog instances and unlock transitions.
//!
//! Definitions live in `catalog`; this module owns the runtime record and
//! the one-way unlock machinery. Unlocking pays out coins at the fixed
//! dollar ratio plus a flat XP bonus, exactly once per achievement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{ACHIEVEMENT_UNLOCK_XP, coins_for_cents};
use crate::levels::apply_xp;
use crate::state::GamificationState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Revenue,
    Streak,
    Task,
    Social,
    Milestone,
}

impl AchievementCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::Streak => "streak",
            Self::Task => "task",
            Self::Social => "social",
            Self::Milestone => "milestone",
        }
    }
}

impl fmt::Display for AchievementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One achievement: static definition fields plus mutable runtime state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: AchievementCategory,
    pub icon: String,
    /// Reward value in cents; converted to coins at the fixed ratio on unlock.
    pub dollar_cents: i64,
    pub reward: String,
    #[serde(default)]
    pub target: Option<u32>,
    #[serde(default)]
    pub unlocked: bool,
    #[serde(default)]
    pub unlocked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub progress: Option<u32>,
}

impl Achievement {
    /// Fraction of the way to the target, 0.0 when no target is defined.
    #[must_use]
    pub fn progress_ratio(&self) -> f32 {
        match (self.progress, self.target) {
            (Some(progress), Some(target)) => {
                crate::numbers::progress_ratio(i64::from(progress), i64::from(target))
            }
            _ => 0.0,
        }
    }
}

/// Result of an unlock attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockOutcome {
    Unlocked { coins: i64, xp: i64 },
    AlreadyUnlocked,
    UnknownId,
}

impl UnlockOutcome {
    /// Whether the attempt mutated state (and needs persisting).
    #[must_use]
    pub const fn changed(self) -> bool {
        matches!(self, Self::Unlocked { .. })
    }
}

/// Unlock the achievement by id, crediting its coin and XP rewards.
/// Re-unlocking is a no-op: already-earned rewards are never paid twice.
pub fn unlock_achievement(
    gs: &mut GamificationState,
    id: &str,
    now: DateTime<Utc>,
) -> UnlockOutcome {
    let Some(achievement) = gs.achievements.iter_mut().find(|a| a.id == id) else {
        return UnlockOutcome::UnknownId;
    };
    if achievement.unlocked {
        return UnlockOutcome::AlreadyUnlocked;
    }

    achievement.unlocked = true;
    achievement.unlocked_at = Some(now);
    let cents = achievement.dollar_cents;

    let coins = coins_for_cents(cents);
    gs.creator_coins.add(coins);
    gs.record_revenue(cents, now);
    apply_xp(&mut gs.user_level, ACHIEVEMENT_UNLOCK_XP);

    UnlockOutcome::Unlocked {
        coins,
        xp: ACHIEVEMENT_UNLOCK_XP,
    }
}

/// Result of a progress update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressOutcome {
    Progressed { progress: u32 },
    Unlocked { coins: i64, xp: i64 },
    AlreadyUnlocked,
    UnknownId,
}

impl ProgressOutcome {
    #[must_use]
    pub const fn changed(self) -> bool {
        matches!(self, Self::Progressed { .. } | Self::Unlocked { .. })
    }
}

/// Move progress toward the target. Crossing the target delegates to
/// `unlock_achievement`; already-unlocked achievements ignore updates.
pub fn update_achievement_progress(
    gs: &mut GamificationState,
    id: &str,
    progress: u32,
    now: DateTime<Utc>,
) -> ProgressOutcome {
    let Some(achievement) = gs.achievements.iter_mut().find(|a| a.id == id) else {
        return ProgressOutcome::UnknownId;
    };
    if achievement.unlocked {
        return ProgressOutcome::AlreadyUnlocked;
    }

    achievement.progress = Some(progress);
    let crossed = achievement.target.is_some_and(|target| progress >= target);

    if crossed {
        match unlock_achievement(gs, id, now) {
            UnlockOutcome::Unlocked { coins, xp } => ProgressOutcome::Unlocked { coins, xp },
            // Unreachable given the guards above; keep the no-op semantics.
            UnlockOutcome::AlreadyUnlocked => ProgressOutcome::AlreadyUnlocked,
            UnlockOutcome::UnknownId => ProgressOutcome::UnknownId,
        }
    } else {
        ProgressOutcome::Progressed { progress }
    }
}
