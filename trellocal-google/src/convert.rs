//! Conversion between trellocal events and Google Calendar API events.

use anyhow::{Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use google_calendar::types::{Event, EventDateTime};
use trellocal_core::{CalendarEvent, NewEvent};

pub trait ToGoogle {
    fn to_google(&self) -> Event;
}

pub trait FromGoogle {
    fn from_google(event: Event) -> Result<Self>
    where
        Self: Sized;
}

impl ToGoogle for NewEvent {
    fn to_google(&self) -> Event {
        Event {
            summary: self.title.clone(),
            description: format!("Trello card {}", self.card_id),
            start: Some(date_time_to_google(self.start)),
            end: Some(date_time_to_google(self.end)),
            ..Default::default()
        }
    }
}

impl FromGoogle for CalendarEvent {
    fn from_google(event: Event) -> Result<Self> {
        let Some(start) = event.start.as_ref().and_then(google_to_date_time) else {
            bail!("Event '{}' has no start time", event.summary);
        };
        let Some(end) = event.end.as_ref().and_then(google_to_date_time) else {
            bail!("Event '{}' has no end time", event.summary);
        };

        Ok(CalendarEvent {
            id: event.id,
            title: event.summary,
            start,
            end,
        })
    }
}

fn date_time_to_google(dt: DateTime<Utc>) -> EventDateTime {
    EventDateTime {
        date: None,
        date_time: Some(dt),
        time_zone: String::new(),
    }
}

/// Timed events keep their instant; all-day events start at midnight UTC.
fn google_to_date_time(time: &EventDateTime) -> Option<DateTime<Utc>> {
    time.date_time
        .or_else(|| time.date.map(midnight_utc))
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}
