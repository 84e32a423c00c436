//! The persisted gamification aggregate.
//!
//! The whole engagement state serializes to a single JSON blob. Loading is
//! lenient: a missing or malformed blob degrades to defaults, and a valid
//! blob is rehydrated against the current catalogs so schema growth never
//! strands a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::achievements::Achievement;
use crate::catalog;
use crate::coins::{CreatorCoins, SpendOutcome};
use crate::constants::VELOCITY_SAMPLE_CAP;
use crate::daily::{ChallengeBoard, DailyLoginState};
use crate::levels::{LevelUp, UserLevel, apply_xp, title_for_level, xp_threshold};
use crate::referral::{ReferralData, generate_code_from_entropy};
use crate::streaks::Streaks;
use crate::velocity::EarningsSample;

/// Why a persisted blob could not be decoded as-is.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("state blob is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("state blob is missing required section `{0}`")]
    MissingSection(&'static str),
}

/// Sections that must be present for a blob to be trusted at all.
const REQUIRED_SECTIONS: [&str; 3] = ["user_level", "creator_coins", "achievements"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamificationState {
    /// Monotonic save counter for staleness inspection.
    #[serde(default)]
    pub revision: u64,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
    pub user_level: UserLevel,
    pub creator_coins: CreatorCoins,
    pub achievements: Vec<Achievement>,
    #[serde(default)]
    pub streaks: Streaks,
    #[serde(default)]
    pub daily_login: DailyLoginState,
    #[serde(default)]
    pub challenges: ChallengeBoard,
    #[serde(default)]
    pub referral: ReferralData,
    /// Cumulative reward revenue in cents, across all sources.
    #[serde(default)]
    pub lifetime_revenue_cents: i64,
    #[serde(default)]
    pub earnings_samples: Vec<EarningsSample>,
}

impl GamificationState {
    /// Fresh default state for the calendar day containing `now`.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        let entropy = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        Self {
            revision: 0,
            last_updated: now,
            user_level: UserLevel::default(),
            creator_coins: CreatorCoins::default(),
            achievements: catalog::default_achievements(),
            streaks: Streaks::default(),
            daily_login: DailyLoginState::default(),
            challenges: ChallengeBoard::generate(now),
            referral: ReferralData {
                code: generate_code_from_entropy(entropy),
                ..ReferralData::default()
            },
            lifetime_revenue_cents: 0,
            earnings_samples: Vec::new(),
        }
    }

    /// Strictly decode a blob, rejecting JSON that lacks the required
    /// top-level sections.
    ///
    /// # Errors
    ///
    /// Returns an error when the blob is not JSON, is missing a required
    /// section, or a section has the wrong shape.
    pub fn try_from_blob(blob: &str) -> Result<Self, StateError> {
        let value: serde_json::Value = serde_json::from_str(blob)?;
        for section in REQUIRED_SECTIONS {
            if value.get(section).is_none() {
                return Err(StateError::MissingSection(section));
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Leniently decode a blob: any decode failure falls back to a fresh
    /// default state, and successful decodes are rehydrated.
    #[must_use]
    pub fn from_blob(blob: &str, now: DateTime<Utc>) -> Self {
        match Self::try_from_blob(blob) {
            Ok(state) => state.rehydrate(now),
            Err(err) => {
                log::warn!("discarding unusable state blob: {err}");
                Self::new(now)
            }
        }
    }

    /// Reconcile a decoded state with the current catalogs and invariants.
    /// Serialized forms from older builds stay usable: new achievements
    /// appear locked, short schedules are refilled, stale challenge boards
    /// regenerate, and out-of-range numbers are clamped.
    #[must_use]
    pub fn rehydrate(mut self, now: DateTime<Utc>) -> Self {
        for fresh in catalog::default_achievements() {
            if !self.achievements.iter().any(|a| a.id == fresh.id) {
                self.achievements.push(fresh);
            }
        }

        self.daily_login.repair_schedule();
        self.challenges.refresh(now);

        let level = &mut self.user_level;
        if level.level == 0 {
            level.level = 1;
        }
        if level.xp < 0 {
            level.xp = 0;
        }
        if level.xp_to_next <= 0 {
            level.xp_to_next = xp_threshold(level.level);
        }
        while level.xp >= level.xp_to_next {
            level.xp -= level.xp_to_next;
            level.level += 1;
            level.xp_to_next = xp_threshold(level.level);
        }
        level.title = title_for_level(level.level).to_string();

        if self.creator_coins.balance < 0 {
            self.creator_coins.balance = 0;
        }
        if self.creator_coins.lifetime_earned < 0 {
            self.creator_coins.lifetime_earned = 0;
        }
        if self.lifetime_revenue_cents < 0 {
            self.lifetime_revenue_cents = 0;
        }

        for kind in crate::streaks::StreakKind::ALL {
            let streak = self.streaks.get_mut(kind);
            streak.longest = streak.longest.max(streak.current);
        }

        if self.referral.code.is_empty() {
            let entropy = u64::try_from(now.timestamp_millis()).unwrap_or(0);
            self.referral.code = generate_code_from_entropy(entropy);
        }

        if self.earnings_samples.len() > VELOCITY_SAMPLE_CAP {
            let excess = self.earnings_samples.len() - VELOCITY_SAMPLE_CAP;
            self.earnings_samples.drain(..excess);
        }

        self
    }

    /// Stamp a save: bump the revision and refresh `last_updated`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.revision = self.revision.wrapping_add(1);
        self.last_updated = now;
    }

    /// Add XP through the leveling loop.
    pub fn add_xp(&mut self, amount: i64) -> LevelUp {
        apply_xp(&mut self.user_level, amount)
    }

    /// Credit coins directly (no revenue attribution).
    pub fn add_coins(&mut self, amount: i64) {
        self.creator_coins.add(amount);
    }

    /// Attempt a coin spend; see [`SpendOutcome`].
    pub fn spend_coins(&mut self, amount: i64) -> SpendOutcome {
        self.creator_coins.spend(amount)
    }

    /// Attribute earned reward revenue and append a velocity sample.
    pub fn record_revenue(&mut self, cents: i64, now: DateTime<Utc>) {
        if cents <= 0 {
            return;
        }
        self.lifetime_revenue_cents += cents;
        self.earnings_samples.push(EarningsSample {
            at: now,
            lifetime_cents: self.lifetime_revenue_cents,
        });
        if self.earnings_samples.len() > VELOCITY_SAMPLE_CAP {
            self.earnings_samples.remove(0);
        }
    }
}
