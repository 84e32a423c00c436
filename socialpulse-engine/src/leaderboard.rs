//! Mock leaderboard generation.
//!
//! Demo data only: a fixed roster with seeded jitter so the board is
//! stable for a given seed but looks alive across sessions.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;

use crate::catalog::DEMO_CREATORS;
use crate::state::GamificationState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub name: String,
    pub handle: String,
    pub earnings_cents: i64,
    pub level: u32,
    pub is_user: bool,
}

/// Build the demo leaderboard for a seed, ranking the user's own lifetime
/// revenue against the jittered roster.
#[must_use]
pub fn demo_leaderboard(seed: u64, gs: &GamificationState) -> Vec<LeaderboardEntry> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);

    let mut entries: Vec<LeaderboardEntry> = DEMO_CREATORS
        .iter()
        .map(|creator| {
            // Jitter within ±10% of the baseline.
            let jitter = rng.gen_range(-10i64..=10);
            let earnings = creator.base_cents + creator.base_cents * jitter / 100;
            LeaderboardEntry {
                rank: 0,
                name: creator.name.to_string(),
                handle: creator.handle.to_string(),
                earnings_cents: earnings.max(0),
                level: creator.level,
                is_user: false,
            }
        })
        .collect();

    entries.push(LeaderboardEntry {
        rank: 0,
        name: "You".to_string(),
        handle: gs.referral.code.clone(),
        earnings_cents: gs.lifetime_revenue_cents,
        level: gs.user_level.level,
        is_user: true,
    });

    entries.sort_by(|a, b| b.earnings_cents.cmp(&a.earnings_cents));
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i as u32 + 1;
    }
    entries
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
    fn same_seed_is_deterministic() {
        let gs = GamificationState::new(now());
        let a = demo_leaderboard(1337, &gs);
        let b = demo_leaderboard(1337, &gs);
        assert_eq!(a, b);
    }

    #[test]
    fn board_holds_roster_plus_user_ranked_by_earnings() {
        let mut gs = GamificationState::new(now());
        gs.lifetime_revenue_cents = 999_999_999;
        let board = demo_leaderboard(7, &gs);
        assert_eq!(board.len(), DEMO_CREATORS.len() + 1);
        assert!(board[0].is_user);
        assert_eq!(board[0].rank, 1);
        for pair in board.windows(2) {
            assert!(pair[0].earnings_cents >= pair[1].earnings_cents);
        }
    }

    #[test]
    fn fresh_user_lands_at_the_bottom() {
        let gs = GamificationState::new(now());
        let board = demo_leaderboard(42, &gs);
        let user = board.iter().find(|e| e.is_user).unwrap();
        assert_eq!(user.rank, board.len() as u32);
    }
}
