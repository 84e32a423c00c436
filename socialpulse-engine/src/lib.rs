//! SocialPulse Gamification Engine
//!
//! Platform-agnostic engagement logic for the SocialPulse creator
//! dashboard: XP and levels, Creator Coins, achievements, streaks, daily
//! login rewards, daily challenges, and the derived nudge views — without
//! UI or platform-specific dependencies.

pub mod achievements;
pub mod actions;
pub mod alerts;
pub mod catalog;
pub mod coins;
pub mod constants;
pub mod daily;
pub mod leaderboard;
pub mod levels;
pub mod numbers;
pub mod prefs;
pub mod referral;
pub mod state;
pub mod streaks;
pub mod velocity;

// Re-export commonly used types
pub use achievements::{
    Achievement, AchievementCategory, ProgressOutcome, UnlockOutcome, unlock_achievement,
    update_achievement_progress,
};
pub use actions::{ActionList, ActionPriority, NextBestAction, next_best_actions};
pub use alerts::{AlertKind, NearMissAlert, near_miss_alerts};
pub use coins::{CreatorCoins, SpendOutcome, format_cents};
pub use constants::{PREFS_KEY, STATE_KEY};
pub use daily::{
    ChallengeBoard, ChallengeOutcome, ClaimOutcome, DailyChallenge, DailyLoginReward,
    DailyLoginState, claim_daily_login_reward, update_challenge_progress,
};
pub use leaderboard::{LeaderboardEntry, demo_leaderboard};
pub use levels::{LevelUp, UserLevel, apply_xp, title_for_level, xp_threshold};
pub use prefs::{AccessibilityPrefs, load_prefs, save_prefs};
pub use referral::{ReferralData, generate_code_from_entropy, parse_code};
pub use state::{GamificationState, StateError};
pub use streaks::{Streak, StreakKind, StreakUpdate, Streaks};
pub use velocity::{EarningsSample, EarningsVelocity, Trend, earnings_velocity};

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// Trait for abstracting the local key-value blob store.
/// Platform-specific implementations should provide this.
pub trait StateStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist a serialized blob under a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be written.
    fn save_state(&self, key: &str, blob: &str) -> Result<(), Self::Error>;

    /// Load the raw blob stored under a key, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn load_state(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Delete the blob stored under a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion fails.
    fn delete_state(&self, key: &str) -> Result<(), Self::Error>;
}

/// In-memory store, used by tests and the QA tester binary.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl StateStore for MemoryStore {
    type Error = std::convert::Infallible;

    fn save_state(&self, key: &str, blob: &str) -> Result<(), Self::Error> {
        if let Ok(mut blobs) = self.blobs.lock() {
            blobs.insert(key.to_string(), blob.to_string());
        }
        Ok(())
    }

    fn load_state(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self
            .blobs
            .lock()
            .map(|blobs| blobs.get(key).cloned())
            .unwrap_or(None))
    }

    fn delete_state(&self, key: &str) -> Result<(), Self::Error> {
        if let Ok(mut blobs) = self.blobs.lock() {
            blobs.remove(key);
        }
        Ok(())
    }
}

/// Engine facade: loads, mutates, and persists the aggregate through an
/// injected store. Every operation is load → transition → best-effort save;
/// no-op outcomes skip the save so they stay true no-ops on disk too.
pub struct GamificationEngine<S>
where
    S: StateStore,
{
    store: S,
}

impl<S> GamificationEngine<S>
where
    S: StateStore,
{
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Load the current state, repairing anything unusable. Never fails
    /// outward: store errors and malformed blobs degrade to defaults, and
    /// a first-ever load seeds and persists the default state.
    pub fn load(&self) -> GamificationState {
        self.load_at(Utc::now())
    }

    /// Clock-injected form of [`Self::load`].
    pub fn load_at(&self, now: DateTime<Utc>) -> GamificationState {
        match self.store.load_state(STATE_KEY) {
            Ok(Some(blob)) => GamificationState::from_blob(&blob, now),
            Ok(None) => {
                let mut state = GamificationState::new(now);
                self.persist(&mut state, now);
                state
            }
            Err(err) => {
                log::warn!("state load failed, using defaults: {err}");
                GamificationState::new(now)
            }
        }
    }

    /// Strict load for callers that want failures surfaced instead of
    /// repaired. `Ok(None)` means nothing has been persisted yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails or the blob is unusable.
    pub fn try_load(&self) -> Result<Option<GamificationState>, anyhow::Error> {
        if let Some(blob) = self.store.load_state(STATE_KEY)? {
            let state = GamificationState::try_from_blob(&blob)?;
            Ok(Some(state.rehydrate(Utc::now())))
        } else {
            Ok(None)
        }
    }

    /// Delete the persisted aggregate.
    ///
    /// # Errors
    ///
    /// Returns the store's error when the deletion fails.
    pub fn reset(&self) -> Result<(), S::Error> {
        self.store.delete_state(STATE_KEY)
    }

    fn persist(&self, state: &mut GamificationState, now: DateTime<Utc>) {
        state.touch(now);
        match serde_json::to_string(state) {
            Ok(blob) => {
                if let Err(err) = self.store.save_state(STATE_KEY, &blob) {
                    log::warn!("state save failed: {err}");
                }
            }
            Err(err) => log::warn!("state serialize failed: {err}"),
        }
    }

    /// Award XP, persisting when anything changed.
    pub fn add_xp(&self, amount: i64) -> GamificationState {
        self.add_xp_at(amount, Utc::now())
    }

    pub fn add_xp_at(&self, amount: i64, now: DateTime<Utc>) -> GamificationState {
        let mut state = self.load_at(now);
        if amount > 0 {
            state.add_xp(amount);
            self.persist(&mut state, now);
        }
        state
    }

    /// Credit coins, persisting when anything changed.
    pub fn add_coins(&self, amount: i64) -> GamificationState {
        self.add_coins_at(amount, Utc::now())
    }

    pub fn add_coins_at(&self, amount: i64, now: DateTime<Utc>) -> GamificationState {
        let mut state = self.load_at(now);
        if amount > 0 {
            state.add_coins(amount);
            self.persist(&mut state, now);
        }
        state
    }

    /// Attempt a spend. A declined spend is not persisted: nothing happened.
    pub fn spend_coins(&self, amount: i64) -> (GamificationState, SpendOutcome) {
        self.spend_coins_at(amount, Utc::now())
    }

    pub fn spend_coins_at(
        &self,
        amount: i64,
        now: DateTime<Utc>,
    ) -> (GamificationState, SpendOutcome) {
        let mut state = self.load_at(now);
        let outcome = state.spend_coins(amount);
        if outcome.is_spent() {
            self.persist(&mut state, now);
        }
        (state, outcome)
    }

    pub fn unlock_achievement(&self, id: &str) -> (GamificationState, UnlockOutcome) {
        self.unlock_achievement_at(id, Utc::now())
    }

    pub fn unlock_achievement_at(
        &self,
        id: &str,
        now: DateTime<Utc>,
    ) -> (GamificationState, UnlockOutcome) {
        let mut state = self.load_at(now);
        let outcome = unlock_achievement(&mut state, id, now);
        if outcome.changed() {
            self.persist(&mut state, now);
        }
        (state, outcome)
    }

    pub fn update_achievement_progress(
        &self,
        id: &str,
        progress: u32,
    ) -> (GamificationState, ProgressOutcome) {
        self.update_achievement_progress_at(id, progress, Utc::now())
    }

    pub fn update_achievement_progress_at(
        &self,
        id: &str,
        progress: u32,
        now: DateTime<Utc>,
    ) -> (GamificationState, ProgressOutcome) {
        let mut state = self.load_at(now);
        let outcome = update_achievement_progress(&mut state, id, progress, now);
        if outcome.changed() {
            self.persist(&mut state, now);
        }
        (state, outcome)
    }

    pub fn update_streak(&self, kind: StreakKind) -> (GamificationState, StreakUpdate) {
        self.update_streak_at(kind, Utc::now())
    }

    pub fn update_streak_at(
        &self,
        kind: StreakKind,
        now: DateTime<Utc>,
    ) -> (GamificationState, StreakUpdate) {
        let mut state = self.load_at(now);
        let update = state.streaks.get_mut(kind).touch(now);
        if update.changed() {
            self.persist(&mut state, now);
        }
        (state, update)
    }

    pub fn claim_daily_login_reward(&self) -> (GamificationState, ClaimOutcome) {
        self.claim_daily_login_reward_at(Utc::now())
    }

    pub fn claim_daily_login_reward_at(
        &self,
        now: DateTime<Utc>,
    ) -> (GamificationState, ClaimOutcome) {
        let mut state = self.load_at(now);
        let outcome = claim_daily_login_reward(&mut state, now);
        if outcome.changed() {
            self.persist(&mut state, now);
        }
        (state, outcome)
    }

    pub fn update_challenge_progress(
        &self,
        id: &str,
        progress: u32,
    ) -> (GamificationState, ChallengeOutcome) {
        self.update_challenge_progress_at(id, progress, Utc::now())
    }

    pub fn update_challenge_progress_at(
        &self,
        id: &str,
        progress: u32,
        now: DateTime<Utc>,
    ) -> (GamificationState, ChallengeOutcome) {
        let mut state = self.load_at(now);
        let outcome = update_challenge_progress(&mut state, id, progress, now);
        if outcome.changed() {
            self.persist(&mut state, now);
        }
        (state, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn first_load_seeds_and_persists_defaults() {
        let engine = GamificationEngine::new(MemoryStore::default());
        let now = at("2025-03-01T09:00:00Z");

        let state = engine.load_at(now);
        assert_eq!(state.user_level.level, 1);
        assert_eq!(state.achievements.len(), 10);

        // The seed write is visible through the strict loader too.
        let stored = engine.try_load().unwrap();
        assert!(stored.is_some());
    }

    #[test]
    fn operations_roundtrip_through_the_store() {
        let engine = GamificationEngine::new(MemoryStore::default());
        let now = at("2025-03-01T09:00:00Z");

        engine.add_coins_at(500, now);
        let (state, outcome) = engine.spend_coins_at(200, now);
        assert!(outcome.is_spent());
        assert_eq!(state.creator_coins.balance, 300);

        let reloaded = engine.load_at(now);
        assert_eq!(reloaded.creator_coins.balance, 300);
        assert_eq!(reloaded.creator_coins.lifetime_earned, 500);
    }

    #[test]
    fn declined_spend_does_not_persist() {
        let engine = GamificationEngine::new(MemoryStore::default());
        let now = at("2025-03-01T09:00:00Z");

        engine.add_coins_at(100, now);
        let before = engine.load_at(now).revision;
        let (_, outcome) = engine.spend_coins_at(1_000, now);
        assert!(!outcome.is_spent());
        assert_eq!(engine.load_at(now).revision, before);
    }

    #[test]
    fn streak_hold_skips_the_save_entirely() {
        let engine = GamificationEngine::new(MemoryStore::default());
        let t0 = at("2025-03-01T09:00:00Z");

        let (_, first) = engine.update_streak_at(StreakKind::Task, t0);
        assert_eq!(first, StreakUpdate::Started);
        let revision = engine.load_at(t0).revision;

        let (_, held) = engine.update_streak_at(StreakKind::Task, at("2025-03-01T15:00:00Z"));
        assert_eq!(held, StreakUpdate::Held);
        assert_eq!(engine.load_at(t0).revision, revision);
    }

    #[test]
    fn reset_clears_the_persisted_blob() {
        let engine = GamificationEngine::new(MemoryStore::default());
        let now = at("2025-03-01T09:00:00Z");
        engine.add_coins_at(100, now);
        engine.reset().unwrap();
        assert!(engine.try_load().unwrap().is_none());
    }
}
