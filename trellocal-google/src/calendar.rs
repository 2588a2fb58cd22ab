//! Google Calendar as a `TaskCalendar`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use google_calendar::Client;
use google_calendar::types::{OrderBy, SendUpdates};
use tracing::debug;
use trellocal_core::{CalendarEvent, NewEvent, TaskCalendar};

use crate::convert::{FromGoogle, ToGoogle};
use crate::session::Session;

pub struct GoogleCalendar {
    client: Client,
    calendar_id: String,
}

impl GoogleCalendar {
    pub fn new(session: &Session, calendar_id: impl Into<String>) -> Self {
        GoogleCalendar {
            client: session.client(),
            calendar_id: calendar_id.into(),
        }
    }

    /// Live events from `events.list`. With `single_events` recurring series
    /// come back as their instances, otherwise as the series itself.
    async fn fetch(&self, single_events: bool, time_min: &str) -> Result<Vec<CalendarEvent>> {
        debug!(calendar_id = %self.calendar_id, single_events, %time_min, "listing events");

        let response = self
            .client
            .events()
            .list_all(
                &self.calendar_id,
                "",
                0,
                OrderBy::default(),
                &[],
                "", // search query
                &[],
                false,
                false,
                single_events,
                "",
                time_min,
                "",
                "",
            )
            .await
            .with_context(|| format!("Failed to fetch events from calendar {}", self.calendar_id))?;

        response
            .body
            .into_iter()
            .filter(|e| e.status != "cancelled")
            .map(CalendarEvent::from_google)
            .collect()
    }
}

/// Whether a failed delete only says the event no longer exists.
fn is_already_gone(error: &str) -> bool {
    error.contains("410") || error.contains("Gone") || error.contains("404 Not Found")
}

impl TaskCalendar for GoogleCalendar {
    async fn list_events(&self, from: Option<DateTime<Utc>>) -> Result<Vec<CalendarEvent>> {
        let time_min = from.map(|dt| dt.to_rfc3339()).unwrap_or_default();
        let mut events = self.fetch(true, &time_min).await?;

        // timeMin filters on end time; keep only events that start in range
        if let Some(from) = from {
            events.retain(|e| e.start >= from);
        }
        events.sort_by_key(|e| e.start);

        Ok(events)
    }

    async fn list_series(&self) -> Result<Vec<CalendarEvent>> {
        self.fetch(false, "").await
    }

    async fn delete_event(&self, event_id: &str) -> Result<()> {
        let result = self
            .client
            .events()
            .delete(&self.calendar_id, event_id, false, SendUpdates::None)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if is_already_gone(&e.to_string()) {
                    debug!(event_id, "event already deleted");
                    Ok(())
                } else {
                    Err(e).with_context(|| format!("Failed to delete event: {}", event_id))
                }
            }
        }
    }

    async fn insert_event(&self, event: &NewEvent) -> Result<CalendarEvent> {
        let google_event = event.to_google();

        let response = self
            .client
            .events()
            .insert(
                &self.calendar_id,
                0,
                0,
                false,
                SendUpdates::None,
                false,
                &google_event,
            )
            .await
            .with_context(|| format!("Failed to create event: {}", &google_event.summary))?;

        CalendarEvent::from_google(response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gone_and_not_found_count_as_deleted() {
        assert!(is_already_gone("HTTP 410 Gone: Resource has been deleted"));
        assert!(is_already_gone("code 404 Not Found"));
    }

    #[test]
    fn other_failures_are_not_swallowed() {
        assert!(!is_already_gone("403 Forbidden: rateLimitExceeded"));
        assert!(!is_already_gone("500 Internal Server Error (request 4041)"));
        assert!(!is_already_gone("error sending request: connection reset"));
    }
}
