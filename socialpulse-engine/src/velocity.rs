//! Earnings velocity derived from a short window of revenue samples.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{VELOCITY_DAY_HOURS, VELOCITY_MONTH_DAYS, VELOCITY_TREND_BAND};
use crate::numbers::i64_to_f64;

/// A point-in-time reading of cumulative revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsSample {
    pub at: DateTime<Utc>,
    pub lifetime_cents: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// Hourly earning rate plus its day/month extrapolations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarningsVelocity {
    pub hourly_cents: f64,
    pub daily_cents: f64,
    pub monthly_cents: f64,
    pub trend: Trend,
}

impl EarningsVelocity {
    const ZERO: Self = Self {
        hourly_cents: 0.0,
        daily_cents: 0.0,
        monthly_cents: 0.0,
        trend: Trend::Stable,
    };
}

/// Cents-per-hour between two samples; 0.0 when time has not advanced.
fn rate_between(older: &EarningsSample, newer: &EarningsSample) -> f64 {
    let seconds = (newer.at - older.at).num_seconds();
    if seconds <= 0 {
        return 0.0;
    }
    let hours = i64_to_f64(seconds) / 3600.0;
    let delta = i64_to_f64(newer.lifetime_cents - older.lifetime_cents).max(0.0);
    delta / hours
}

/// Compute velocity from the sample window. The rate comes from the last
/// two samples; the trend compares that rate to the preceding one with a
/// ±10% band. Fewer than two samples yields a zero, stable velocity.
#[must_use]
pub fn earnings_velocity(samples: &[EarningsSample]) -> EarningsVelocity {
    let n = samples.len();
    if n < 2 {
        return EarningsVelocity::ZERO;
    }

    let hourly = rate_between(&samples[n - 2], &samples[n - 1]);
    let trend = if n < 3 {
        Trend::Stable
    } else {
        let previous = rate_between(&samples[n - 3], &samples[n - 2]);
        if hourly > previous * (1.0 + VELOCITY_TREND_BAND) {
            Trend::Up
        } else if hourly < previous * (1.0 - VELOCITY_TREND_BAND) {
            Trend::Down
        } else {
            Trend::Stable
        }
    };

    let daily = hourly * VELOCITY_DAY_HOURS;
    EarningsVelocity {
        hourly_cents: hourly,
        daily_cents: daily,
        monthly_cents: daily * VELOCITY_MONTH_DAYS,
        trend,
    }
}
