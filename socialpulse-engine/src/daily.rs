//! Daily login rewards and daily challenges.
//!
//! Login rewards follow a fixed ascending 30-day schedule, one claim per
//! calendar day. Past day 30 the schedule wraps: entering a new cycle
//! clears the claimed flags so long streaks keep earning instead of going
//! permanently silent. Challenges are keyed to the calendar date and
//! persist their per-day completion.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::constants::{
    DAILY_LOGIN_XP, LOGIN_STREAK_BREAK_HOURS, REWARD_SCHEDULE_DAYS, coins_for_cents,
};
use crate::levels::apply_xp;
use crate::state::GamificationState;

/// One slot in the 30-day login schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLoginReward {
    pub day: u32,
    pub dollar_cents: i64,
    #[serde(default)]
    pub claimed: bool,
    #[serde(default)]
    pub claimed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLoginState {
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub last_login_date: Option<DateTime<Utc>>,
    pub rewards: Vec<DailyLoginReward>,
    #[serde(default)]
    pub total_earned_cents: i64,
}

impl Default for DailyLoginState {
    fn default() -> Self {
        Self {
            current_streak: 0,
            last_login_date: None,
            rewards: catalog::reward_schedule(),
            total_earned_cents: 0,
        }
    }
}

impl DailyLoginState {
    /// Restore missing schedule slots after a lossy or truncated load.
    pub fn repair_schedule(&mut self) {
        if self.rewards.len() != REWARD_SCHEDULE_DAYS {
            let claimed: Vec<_> = self.rewards.clone();
            self.rewards = catalog::reward_schedule();
            for old in claimed {
                if let Some(slot) = self.rewards.iter_mut().find(|r| r.day == old.day) {
                    slot.claimed = old.claimed;
                    slot.claimed_at = old.claimed_at;
                }
            }
        }
    }
}

/// Result of a daily claim attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed {
        day: u32,
        cents: i64,
        coins: i64,
        xp: i64,
    },
    AlreadyClaimedToday,
}

impl ClaimOutcome {
    #[must_use]
    pub const fn changed(self) -> bool {
        matches!(self, Self::Claimed { .. })
    }
}

/// Claim today's login reward. At most one claim per calendar day; the
/// streak grows while logins stay under 48h apart and restarts otherwise.
pub fn claim_daily_login_reward(gs: &mut GamificationState, now: DateTime<Utc>) -> ClaimOutcome {
    let login = &mut gs.daily_login;

    if let Some(last) = login.last_login_date {
        if last.date_naive() == now.date_naive() {
            return ClaimOutcome::AlreadyClaimedToday;
        }
    }

    let new_streak = match login.last_login_date {
        Some(last) if (now - last).num_hours() < LOGIN_STREAK_BREAK_HOURS => {
            login.current_streak + 1
        }
        _ => 1,
    };

    let slot = ((new_streak - 1) as usize) % REWARD_SCHEDULE_DAYS;
    if slot == 0 {
        // Start of a fresh 30-day cycle (day 1, 31, 61, ...): the schedule
        // repeats, so every slot becomes claimable again.
        for reward in &mut login.rewards {
            reward.claimed = false;
            reward.claimed_at = None;
        }
    }

    let mut cents = 0;
    let mut day = new_streak;
    if let Some(reward) = login.rewards.get_mut(slot) {
        if !reward.claimed {
            reward.claimed = true;
            reward.claimed_at = Some(now);
            cents = reward.dollar_cents;
            day = reward.day;
            login.total_earned_cents += cents;
        }
    }

    login.current_streak = new_streak;
    login.last_login_date = Some(now);

    let coins = coins_for_cents(cents);
    gs.creator_coins.add(coins);
    if cents > 0 {
        gs.record_revenue(cents, now);
    }
    apply_xp(&mut gs.user_level, DAILY_LOGIN_XP);

    ClaimOutcome::Claimed {
        day,
        cents,
        coins,
        xp: DAILY_LOGIN_XP,
    }
}

/// A single daily challenge instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyChallenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub dollar_cents: i64,
    pub xp_reward: i64,
    #[serde(default)]
    pub progress: u32,
    pub target: u32,
    #[serde(default)]
    pub completed: bool,
    pub expires_at: DateTime<Utc>,
}

impl DailyChallenge {
    #[must_use]
    pub fn progress_ratio(&self) -> f32 {
        crate::numbers::progress_ratio(i64::from(self.progress), i64::from(self.target))
    }
}

/// The day's challenge set, keyed to the calendar date it was generated for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChallengeBoard {
    #[serde(default)]
    pub date: NaiveDate,
    #[serde(default)]
    pub challenges: Vec<DailyChallenge>,
}

impl ChallengeBoard {
    /// Build a fresh board for the calendar day containing `now`.
    #[must_use]
    pub fn generate(now: DateTime<Utc>) -> Self {
        let date = now.date_naive();
        Self {
            date,
            challenges: catalog::daily_challenges(end_of_day(now)),
        }
    }

    /// Regenerate when the stored date is not today's; same-day completion
    /// survives reloads untouched.
    pub fn refresh(&mut self, now: DateTime<Utc>) {
        if self.date != now.date_naive() || self.challenges.is_empty() {
            *self = Self::generate(now);
        }
    }
}

/// Midnight UTC following `now`.
fn end_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    let next = now
        .date_naive()
        .succ_opt()
        .unwrap_or_else(|| now.date_naive());
    Utc.from_utc_datetime(&next.and_time(NaiveTime::MIN))
}

/// Result of a challenge progress update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeOutcome {
    Progressed { progress: u32 },
    Completed { coins: i64, xp: i64 },
    AlreadyCompleted,
    UnknownId,
}

impl ChallengeOutcome {
    #[must_use]
    pub const fn changed(self) -> bool {
        matches!(self, Self::Progressed { .. } | Self::Completed { .. })
    }
}

/// Advance a challenge; completion is one-way and pays out exactly once.
pub fn update_challenge_progress(
    gs: &mut GamificationState,
    id: &str,
    progress: u32,
    now: DateTime<Utc>,
) -> ChallengeOutcome {
    let Some(challenge) = gs.challenges.challenges.iter_mut().find(|c| c.id == id) else {
        return ChallengeOutcome::UnknownId;
    };
    if challenge.completed {
        return ChallengeOutcome::AlreadyCompleted;
    }

    challenge.progress = progress;
    if progress < challenge.target {
        return ChallengeOutcome::Progressed { progress };
    }

    challenge.completed = true;
    let cents = challenge.dollar_cents;
    let xp = challenge.xp_reward;

    let coins = coins_for_cents(cents);
    gs.creator_coins.add(coins);
    gs.record_revenue(cents, now);
    apply_xp(&mut gs.user_level, xp);

    ChallengeOutcome::Completed { coins, xp }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(rfc: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn second_claim_same_day_is_a_noop() {
        let now = at("2025-03-01T09:00:00Z");
        let mut gs = GamificationState::new(now);

        let first = claim_daily_login_reward(&mut gs, now);
        assert!(matches!(first, ClaimOutcome::Claimed { day: 1, .. }));
        let total = gs.daily_login.total_earned_cents;
        let balance = gs.creator_coins.balance;

        let again = claim_daily_login_reward(&mut gs, at("2025-03-01T22:00:00Z"));
        assert_eq!(again, ClaimOutcome::AlreadyClaimedToday);
        assert_eq!(gs.daily_login.total_earned_cents, total);
        assert_eq!(gs.creator_coins.balance, balance);
        assert_eq!(gs.daily_login.current_streak, 1);
    }

    #[test]
    fn consecutive_days_grow_the_streak() {
        let mut gs = GamificationState::new(at("2025-03-01T09:00:00Z"));
        for day in 1..=3 {
            let now = at(&format!("2025-03-0{day}T09:00:00Z"));
            let outcome = claim_daily_login_reward(&mut gs, now);
            assert!(matches!(outcome, ClaimOutcome::Claimed { .. }));
        }
        assert_eq!(gs.daily_login.current_streak, 3);
        assert_eq!(
            gs.daily_login.rewards.iter().filter(|r| r.claimed).count(),
            3
        );
    }

    #[test]
    fn gap_over_48h_restarts_streak_and_schedule() {
        let mut gs = GamificationState::new(at("2025-03-01T09:00:00Z"));
        claim_daily_login_reward(&mut gs, at("2025-03-01T09:00:00Z"));
        claim_daily_login_reward(&mut gs, at("2025-03-02T09:00:00Z"));
        assert_eq!(gs.daily_login.current_streak, 2);

        let outcome = claim_daily_login_reward(&mut gs, at("2025-03-06T09:00:00Z"));
        assert!(matches!(outcome, ClaimOutcome::Claimed { day: 1, .. }));
        assert_eq!(gs.daily_login.current_streak, 1);
        // Restart clears the old cycle's claims; only day 1 is claimed now.
        assert_eq!(
            gs.daily_login.rewards.iter().filter(|r| r.claimed).count(),
            1
        );
    }

    #[test]
    fn schedule_wraps_after_day_30() {
        let start = at("2025-01-01T09:00:00Z");
        let mut gs = GamificationState::new(start);
        for day in 0..31 {
            let outcome = claim_daily_login_reward(&mut gs, start + Duration::days(day));
            assert!(matches!(outcome, ClaimOutcome::Claimed { .. }), "day {day}");
        }
        assert_eq!(gs.daily_login.current_streak, 31);
        // Day 31 landed on slot 1 of a fresh cycle and actually paid out.
        assert_eq!(
            gs.daily_login.rewards.iter().filter(|r| r.claimed).count(),
            1
        );
        assert!(gs.daily_login.rewards[0].claimed);
    }

    #[test]
    fn challenges_regenerate_on_date_change_only() {
        let morning = at("2025-03-01T09:00:00Z");
        let mut board = ChallengeBoard::generate(morning);
        board.challenges[0].completed = true;

        // Same day: completion survives.
        board.refresh(at("2025-03-01T23:00:00Z"));
        assert!(board.challenges[0].completed);

        // Next day: fresh board.
        board.refresh(at("2025-03-02T01:00:00Z"));
        assert!(!board.challenges[0].completed);
        assert_eq!(board.date, at("2025-03-02T01:00:00Z").date_naive());
    }

    #[test]
    fn challenge_completion_pays_once() {
        let now = at("2025-03-01T09:00:00Z");
        let mut gs = GamificationState::new(now);
        let (id, target) = {
            let c = &gs.challenges.challenges[0];
            (c.id.clone(), c.target)
        };

        let done = update_challenge_progress(&mut gs, &id, target, now);
        assert!(matches!(done, ChallengeOutcome::Completed { .. }));
        let balance = gs.creator_coins.balance;

        assert_eq!(
            update_challenge_progress(&mut gs, &id, target + 1, now),
            ChallengeOutcome::AlreadyCompleted
        );
        assert_eq!(gs.creator_coins.balance, balance);
    }
}
