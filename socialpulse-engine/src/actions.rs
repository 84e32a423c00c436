//! Next-best-action recommendations.
//!
//! Ranked, capped suggestion list built from incomplete daily challenges
//! and near-complete achievements. Derived on every read; never persisted.

use serde::Serialize;
use smallvec::SmallVec;

use crate::coins::format_cents;
use crate::constants::{NEXT_ACTION_CAP, NEXT_ACTION_RATIO};
use crate::state::GamificationState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextBestAction {
    pub title: String,
    pub description: String,
    pub dollar_cents: i64,
    pub priority: ActionPriority,
}

pub type ActionList = SmallVec<[NextBestAction; 5]>;

/// Build the ranked action list: incomplete challenges first (high
/// priority), then achievements at 70%+ progress (medium), sorted by
/// dollar value descending and capped at five entries.
#[must_use]
pub fn next_best_actions(gs: &GamificationState) -> ActionList {
    let mut actions = ActionList::new();

    for challenge in &gs.challenges.challenges {
        if challenge.completed {
            continue;
        }
        actions.push(NextBestAction {
            title: challenge.title.clone(),
            description: format!(
                "{} — earns {}",
                challenge.description,
                format_cents(challenge.dollar_cents)
            ),
            dollar_cents: challenge.dollar_cents,
            priority: ActionPriority::High,
        });
    }

    for achievement in &gs.achievements {
        if achievement.unlocked {
            continue;
        }
        if achievement.progress_ratio() >= NEXT_ACTION_RATIO {
            actions.push(NextBestAction {
                title: achievement.title.clone(),
                description: format!(
                    "Close out \"{}\" for {}",
                    achievement.title,
                    format_cents(achievement.dollar_cents)
                ),
                dollar_cents: achievement.dollar_cents,
                priority: ActionPriority::Medium,
            });
        }
    }

    actions.sort_by(|a, b| b.dollar_cents.cmp(&a.dollar_cents));
    actions.truncate(NEXT_ACTION_CAP);
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn fresh_state_suggests_all_four_challenges() {
        let gs = GamificationState::new(now());
        let actions = next_best_actions(&gs);
        assert_eq!(actions.len(), 4);
        assert!(actions.iter().all(|a| a.priority == ActionPriority::High));
        // Sorted by value, highest first.
        for pair in actions.windows(2) {
            assert!(pair[0].dollar_cents >= pair[1].dollar_cents);
        }
    }

    #[test]
    fn near_complete_achievements_join_the_list_capped_at_five() {
        let mut gs = GamificationState::new(now());
        for achievement in &mut gs.achievements {
            if let Some(target) = achievement.target {
                achievement.progress = Some(target.saturating_sub(1).max(target * 7 / 10));
            }
        }
        let actions = next_best_actions(&gs);
        assert_eq!(actions.len(), 5);
        assert!(
            actions
                .iter()
                .any(|a| a.priority == ActionPriority::Medium)
        );
    }

    #[test]
    fn completed_challenges_drop_out() {
        let mut gs = GamificationState::new(now());
        for challenge in &mut gs.challenges.challenges {
            challenge.completed = true;
        }
        let actions = next_best_actions(&gs);
        assert!(actions.iter().all(|a| a.priority != ActionPriority::High));
    }

    #[test]
    fn below_seventy_percent_achievements_are_ignored() {
        let mut gs = GamificationState::new(now());
        let idx = gs
            .achievements
            .iter()
            .position(|a| a.id == "hundred-club")
            .unwrap();
        gs.achievements[idx].progress = Some(69);
        assert!(
            next_best_actions(&gs)
                .iter()
                .all(|a| a.priority != ActionPriority::Medium)
        );
        gs.achievements[idx].progress = Some(70);
        assert!(
            next_best_actions(&gs)
                .iter()
                .any(|a| a.priority == ActionPriority::Medium)
        );
    }
}
