//! Time-windowed streak state machines.
//!
//! Each streak kind counts consecutive qualifying days. An update inside
//! the 24h hold window is a true no-op (not even a timestamp bump), the
//! 24-48h window extends the streak, and anything past 48h resets it to 1.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    STREAK_BREAK_HOURS, STREAK_HOLD_HOURS, STREAK_MULTIPLIER_BONUS_CAP, STREAK_MULTIPLIER_STEP,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakKind {
    Login,
    Revenue,
    Posting,
    Task,
}

impl StreakKind {
    pub const ALL: [Self; 4] = [Self::Login, Self::Revenue, Self::Posting, Self::Task];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Revenue => "revenue",
            Self::Posting => "posting",
            Self::Task => "task",
        }
    }
}

impl fmt::Display for StreakKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreakKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" => Ok(Self::Login),
            "revenue" => Ok(Self::Revenue),
            "posting" => Ok(Self::Posting),
            "task" => Ok(Self::Task),
            _ => Err(()),
        }
    }
}

/// How a `touch` call landed relative to the grace window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakUpdate {
    /// First qualifying action ever (or after a zeroed streak).
    Started,
    /// Inside the 24h hold window; state untouched.
    Held,
    /// Inside the 24-48h window; streak grew by one.
    Extended,
    /// Past the 48h window; streak restarted at 1.
    Reset,
}

impl StreakUpdate {
    /// Whether the update mutated the streak (and needs persisting).
    #[must_use]
    pub const fn changed(self) -> bool {
        !matches!(self, Self::Held)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Streak {
    pub kind: StreakKind,
    #[serde(default)]
    pub current: u32,
    /// High-water mark; never drops below `current`.
    #[serde(default)]
    pub longest: u32,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Streak {
    #[must_use]
    pub const fn new(kind: StreakKind) -> Self {
        Self {
            kind,
            current: 0,
            longest: 0,
            last_updated: None,
        }
    }

    /// Earnings multiplier derived from the streak length: 1.0 at zero,
    /// +0.1 per day, capped at 3.0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn multiplier(&self) -> f32 {
        1.0 + (self.current as f32 * STREAK_MULTIPLIER_STEP).min(STREAK_MULTIPLIER_BONUS_CAP)
    }

    /// Register a qualifying action at `now` and advance the window machine.
    pub fn touch(&mut self, now: DateTime<Utc>) -> StreakUpdate {
        let Some(last) = self.last_updated else {
            return self.restart(now, StreakUpdate::Started);
        };
        if self.current == 0 {
            return self.restart(now, StreakUpdate::Started);
        }

        let elapsed_hours = (now - last).num_hours();
        if elapsed_hours < STREAK_HOLD_HOURS {
            // Same-day activity must not postpone the streak clock.
            return StreakUpdate::Held;
        }
        if elapsed_hours < STREAK_BREAK_HOURS {
            self.current += 1;
            self.longest = self.longest.max(self.current);
            self.last_updated = Some(now);
            return StreakUpdate::Extended;
        }
        self.restart(now, StreakUpdate::Reset)
    }

    fn restart(&mut self, now: DateTime<Utc>, update: StreakUpdate) -> StreakUpdate {
        self.current = 1;
        self.longest = self.longest.max(1);
        self.last_updated = Some(now);
        update
    }
}

/// The four tracked streaks, seeded at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Streaks {
    pub login: Streak,
    pub revenue: Streak,
    pub posting: Streak,
    pub task: Streak,
}

impl Default for Streaks {
    fn default() -> Self {
        Self {
            login: Streak::new(StreakKind::Login),
            revenue: Streak::new(StreakKind::Revenue),
            posting: Streak::new(StreakKind::Posting),
            task: Streak::new(StreakKind::Task),
        }
    }
}

impl Streaks {
    #[must_use]
    pub const fn get(&self, kind: StreakKind) -> &Streak {
        match kind {
            StreakKind::Login => &self.login,
            StreakKind::Revenue => &self.revenue,
            StreakKind::Posting => &self.posting,
            StreakKind::Task => &self.task,
        }
    }

    pub const fn get_mut(&mut self, kind: StreakKind) -> &mut Streak {
        match kind {
            StreakKind::Login => &mut self.login,
            StreakKind::Revenue => &mut self.revenue,
            StreakKind::Posting => &mut self.posting,
            StreakKind::Task => &mut self.task,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Streak> {
        [&self.login, &self.revenue, &self.posting, &self.task].into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn base_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn grace_window_sequence() {
        let t0 = base_time();
        let mut streak = Streak::new(StreakKind::Task);

        assert_eq!(streak.touch(t0), StreakUpdate::Started);
        assert_eq!(streak.current, 1);

        // 23h later: held, timestamp untouched.
        assert_eq!(streak.touch(t0 + Duration::hours(23)), StreakUpdate::Held);
        assert_eq!(streak.current, 1);
        assert_eq!(streak.last_updated, Some(t0));

        // 30h after t0: extend.
        let t_ext = t0 + Duration::hours(30);
        assert_eq!(streak.touch(t_ext), StreakUpdate::Extended);
        assert_eq!(streak.current, 2);
        assert_eq!(streak.longest, 2);

        // 49h after the extension: reset to 1.
        assert_eq!(
            streak.touch(t_ext + Duration::hours(49)),
            StreakUpdate::Reset
        );
        assert_eq!(streak.current, 1);
        assert_eq!(streak.longest, 2);
    }

    #[test]
    fn hold_window_is_a_true_noop() {
        let t0 = base_time();
        let mut streak = Streak::new(StreakKind::Login);
        streak.touch(t0);

        // Repeated same-day touches never advance the clock, so the streak
        // still extends exactly 30h after the first action.
        for hour in [1, 5, 12, 23] {
            assert_eq!(streak.touch(t0 + Duration::hours(hour)), StreakUpdate::Held);
        }
        assert_eq!(
            streak.touch(t0 + Duration::hours(30)),
            StreakUpdate::Extended
        );
        assert_eq!(streak.current, 2);
    }

    #[test]
    fn multiplier_caps_at_three() {
        let mut streak = Streak::new(StreakKind::Revenue);
        assert!((streak.multiplier() - 1.0).abs() < f32::EPSILON);
        streak.current = 5;
        assert!((streak.multiplier() - 1.5).abs() < 1e-6);
        streak.current = 20;
        assert!((streak.multiplier() - 3.0).abs() < 1e-6);
        streak.current = 400;
        assert!((streak.multiplier() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn longest_is_a_high_water_mark() {
        let t0 = base_time();
        let mut streak = Streak::new(StreakKind::Posting);
        streak.touch(t0);
        streak.touch(t0 + Duration::hours(30));
        streak.touch(t0 + Duration::hours(60));
        assert_eq!(streak.current, 3);
        assert_eq!(streak.longest, 3);

        streak.touch(t0 + Duration::hours(200));
        assert_eq!(streak.current, 1);
        assert_eq!(streak.longest, 3);
    }
}
