//! Seams implemented by the Trello and Google backends.

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::event::{CalendarEvent, NewEvent};
use crate::schedule::CardSchedule;
use crate::task::TaskRecord;

/// Where tasks come from.
#[allow(async_fn_in_trait)]
pub trait TaskSource {
    /// All tasks, in list order.
    async fn fetch_tasks(&self) -> Result<Vec<TaskRecord>>;
}

/// A calendar the tool can read and mutate.
#[allow(async_fn_in_trait)]
pub trait TaskCalendar {
    /// Event occurrences (recurring series expanded into instances),
    /// optionally only those starting at or after `from`.
    async fn list_events(&self, from: Option<DateTime<Utc>>) -> Result<Vec<CalendarEvent>>;

    /// Every event on the calendar with each recurring series listed once,
    /// so that deleting the listed IDs removes all of its instances.
    async fn list_series(&self) -> Result<Vec<CalendarEvent>>;

    /// Delete one event. Deleting an event that is already gone succeeds.
    async fn delete_event(&self, event_id: &str) -> Result<()>;

    async fn insert_event(&self, event: &NewEvent) -> Result<CalendarEvent>;
}

/// Where scheduled dates get written back to.
#[allow(async_fn_in_trait)]
pub trait CardDates {
    async fn set_card_dates(&self, schedule: &CardSchedule) -> Result<()>;
}
