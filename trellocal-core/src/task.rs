//! Tasks read from the source list.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Longest estimate a single card can carry: a year of round-the-clock work.
pub const MAX_ESTIMATE_HOURS: i64 = 24 * 366;

const MAX_MINUTES: i64 = MAX_ESTIMATE_HOURS * 60;

/// Effort estimate for a task, kept in whole minutes within
/// `0..=MAX_ESTIMATE_HOURS` hours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Estimate {
    minutes: i64,
}

impl Estimate {
    pub const ZERO: Estimate = Estimate { minutes: 0 };

    pub fn from_minutes(minutes: i64) -> Self {
        Estimate {
            minutes: minutes.clamp(0, MAX_MINUTES),
        }
    }

    pub fn from_hours(hours: i64) -> Self {
        Self::from_minutes(hours.saturating_mul(60))
    }

    /// Parse a decimal number of hours ("2", "1.5", " 0.25 ").
    ///
    /// Returns `None` for anything that is not a finite number between zero
    /// and `MAX_ESTIMATE_HOURS`.
    pub fn parse_hours(value: &str) -> Option<Self> {
        let hours: f64 = value.trim().parse().ok()?;
        if !hours.is_finite() || !(0.0..=MAX_ESTIMATE_HOURS as f64).contains(&hours) {
            return None;
        }
        Some(Self::from_minutes((hours * 60.0).round() as i64))
    }

    pub fn from_duration(duration: Duration) -> Self {
        Self::from_minutes(duration.num_minutes())
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(self.minutes)
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.minutes / 60;
        let minutes = self.minutes % 60;
        match (hours, minutes) {
            (h, 0) => write!(f, "{}h", h),
            (0, m) => write!(f, "{}m", m),
            (h, m) => write!(f, "{}h{}m", h, m),
        }
    }
}

/// A card from the source list, as read at the start of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Source card ID, used to write scheduled dates back
    pub card_id: String,
    pub title: String,
    pub due_at: Option<DateTime<Utc>>,
    pub estimate: Estimate,
}

impl TaskRecord {
    pub fn new(
        card_id: impl Into<String>,
        title: impl Into<String>,
        due_at: Option<DateTime<Utc>>,
        estimate: Estimate,
    ) -> Self {
        TaskRecord {
            card_id: card_id.into(),
            title: title.into(),
            due_at,
            estimate,
        }
    }
}

impl fmt::Display for TaskRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.estimate)
    }
}
