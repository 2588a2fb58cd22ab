//! Events on the target calendar.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::task::TaskRecord;

/// An event that already exists on a calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Provider-assigned event ID
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// An event to be inserted, derived from a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Card the event was derived from
    pub card_id: String,
}

impl NewEvent {
    /// Event for `task` starting at `start` and lasting `length`.
    ///
    /// Negative lengths are clamped so that `end >= start` always holds.
    pub fn for_task(task: &TaskRecord, start: DateTime<Utc>, length: Duration) -> Self {
        let length = length.max(Duration::zero());
        NewEvent {
            title: task.title.clone(),
            start,
            end: saturating_add(start, length),
            card_id: task.card_id.clone(),
        }
    }
}

/// `at + by`, pinned to the last representable instant instead of overflowing.
pub(crate) fn saturating_add(at: DateTime<Utc>, by: Duration) -> DateTime<Utc> {
    at.checked_add_signed(by).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

impl fmt::Display for NewEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} - {})",
            self.title,
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%Y-%m-%d %H:%M")
        )
    }
}

impl fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.start.format("%Y-%m-%d %H:%M"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Estimate;
    use chrono::TimeZone;

    fn task() -> TaskRecord {
        TaskRecord::new("c1", "Write report", None, Estimate::from_hours(2))
    }

    #[test]
    fn event_spans_the_given_length() {
        let start = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let event = NewEvent::for_task(&task(), start, Duration::hours(2));

        assert_eq!(event.end, Utc.with_ymd_and_hms(2024, 1, 10, 2, 0, 0).unwrap());
        assert_eq!(event.card_id, "c1");
    }

    #[test]
    fn negative_length_gives_zero_length_event() {
        let start = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let event = NewEvent::for_task(&task(), start, Duration::hours(-3));

        assert_eq!(event.end, event.start);
    }

    #[test]
    fn end_past_the_calendar_range_is_pinned() {
        let start = DateTime::<Utc>::MAX_UTC - Duration::hours(1);
        let event = NewEvent::for_task(&task(), start, Duration::hours(2));

        assert_eq!(event.end, DateTime::<Utc>::MAX_UTC);
        assert!(event.end >= event.start);
    }
}
