//! Near-miss alert derivation.
//!
//! Stateless nudges recomputed from the current snapshot on every read:
//! goals at 80%+ progress, streak milestones within reach, and the next
//! revenue milestone. Nothing here is persisted.

use serde::Serialize;
use std::fmt;

use crate::coins::format_cents;
use crate::constants::{
    NEAR_MISS_RATIO, REVENUE_MILESTONES_CENTS, STREAK_ALERT_WINDOW_DAYS, STREAK_MILESTONES,
};
use crate::numbers::progress_ratio;
use crate::state::GamificationState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Milestone,
    Achievement,
    Level,
    Streak,
    Opportunity,
}

impl AlertKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Milestone => "milestone",
            Self::Achievement => "achievement",
            Self::Level => "level",
            Self::Streak => "streak",
            Self::Opportunity => "opportunity",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One nudge: what the user is close to, how far they have left, and what
/// tapping it should do.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearMissAlert {
    pub kind: AlertKind,
    pub message: String,
    /// Units depend on the kind: progress steps, XP, days, or cents.
    pub remaining: i64,
    pub dollar_cents: Option<i64>,
    pub cta: String,
}

/// Derive all current near-miss alerts from the snapshot.
#[must_use]
pub fn near_miss_alerts(gs: &GamificationState) -> Vec<NearMissAlert> {
    let mut alerts = Vec::new();

    for achievement in &gs.achievements {
        if achievement.unlocked {
            continue;
        }
        let (Some(progress), Some(target)) = (achievement.progress, achievement.target) else {
            continue;
        };
        if progress >= target {
            continue;
        }
        let ratio = progress_ratio(i64::from(progress), i64::from(target));
        if ratio >= NEAR_MISS_RATIO {
            let remaining = i64::from(target - progress);
            alerts.push(NearMissAlert {
                kind: AlertKind::Achievement,
                message: format!(
                    "{} more to unlock \"{}\" worth {}",
                    remaining,
                    achievement.title,
                    format_cents(achievement.dollar_cents)
                ),
                remaining,
                dollar_cents: Some(achievement.dollar_cents),
                cta: "View achievement".to_string(),
            });
        }
    }

    let level = &gs.user_level;
    if progress_ratio(level.xp, level.xp_to_next) >= NEAR_MISS_RATIO {
        let remaining = level.xp_to_next - level.xp;
        alerts.push(NearMissAlert {
            kind: AlertKind::Level,
            message: format!("{} XP to reach level {}", remaining, level.level + 1),
            remaining,
            dollar_cents: None,
            cta: "Earn XP".to_string(),
        });
    }

    for streak in gs.streaks.iter() {
        if streak.current == 0 {
            continue;
        }
        let Some(milestone) = STREAK_MILESTONES.iter().find(|m| **m > streak.current) else {
            continue;
        };
        let remaining_days = milestone - streak.current;
        if remaining_days <= STREAK_ALERT_WINDOW_DAYS {
            alerts.push(NearMissAlert {
                kind: AlertKind::Streak,
                message: format!(
                    "{} more days to a {}-day {} streak",
                    remaining_days, milestone, streak.kind
                ),
                remaining: i64::from(remaining_days),
                dollar_cents: None,
                cta: "Keep the streak".to_string(),
            });
        }
    }

    if let Some(milestone) = REVENUE_MILESTONES_CENTS
        .iter()
        .find(|m| **m > gs.lifetime_revenue_cents)
    {
        if progress_ratio(gs.lifetime_revenue_cents, *milestone) >= NEAR_MISS_RATIO {
            let remaining = milestone - gs.lifetime_revenue_cents;
            alerts.push(NearMissAlert {
                kind: AlertKind::Milestone,
                message: format!(
                    "{} away from the {} revenue milestone",
                    format_cents(remaining),
                    format_cents(*milestone)
                ),
                remaining,
                dollar_cents: Some(remaining),
                cta: "See earnings".to_string(),
            });
        }
    }

    for challenge in &gs.challenges.challenges {
        if challenge.completed || challenge.progress >= challenge.target {
            continue;
        }
        if challenge.progress_ratio() >= NEAR_MISS_RATIO {
            let remaining = i64::from(challenge.target - challenge.progress);
            alerts.push(NearMissAlert {
                kind: AlertKind::Opportunity,
                message: format!(
                    "Almost there: \"{}\" pays {}",
                    challenge.title,
                    format_cents(challenge.dollar_cents)
                ),
                remaining,
                dollar_cents: Some(challenge.dollar_cents),
                cta: "Finish challenge".to_string(),
            });
        }
    }

    alerts
}
