//! The clear-then-write pass over the target calendar.
//!
//! There is no rollback: if a write fails after the clear, the calendar is
//! left with whatever was written up to that point.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::event::{CalendarEvent, NewEvent};
use crate::schedule::Plan;
use crate::source::{CardDates, TaskCalendar};

#[derive(Debug, Default)]
pub struct SyncReport {
    pub deleted: usize,
    pub created: Vec<CalendarEvent>,
}

/// Delete every event on the calendar. Returns how many were deleted, a
/// recurring series counting once.
pub async fn clear<C: TaskCalendar>(calendar: &C) -> Result<usize> {
    let events = calendar
        .list_series()
        .await
        .context("Failed to list events on the target calendar")?;

    for event in &events {
        debug!(event_id = %event.id, title = %event.title, "deleting event");
        calendar
            .delete_event(&event.id)
            .await
            .with_context(|| format!("Failed to delete event: {}", event))?;
    }

    info!(deleted = events.len(), "cleared target calendar");
    Ok(events.len())
}

/// Insert `events` in order.
pub async fn write<C: TaskCalendar>(calendar: &C, events: &[NewEvent]) -> Result<Vec<CalendarEvent>> {
    let mut created = Vec::with_capacity(events.len());

    for event in events {
        debug!(title = %event.title, start = %event.start, end = %event.end, "creating event");
        let inserted = calendar
            .insert_event(event)
            .await
            .with_context(|| format!("Failed to create event: {}", event))?;
        created.push(inserted);
    }

    info!(created = created.len(), "wrote events to target calendar");
    Ok(created)
}

/// Make the calendar hold exactly the plan's events.
pub async fn mirror<C: TaskCalendar>(calendar: &C, plan: &Plan) -> Result<SyncReport> {
    let deleted = clear(calendar).await?;
    let created = write(calendar, &plan.events).await?;
    Ok(SyncReport { deleted, created })
}

/// Write the plan's card dates back to the source. Returns how many cards were updated.
pub async fn write_card_dates<D: CardDates>(target: &D, plan: &Plan) -> Result<usize> {
    for schedule in &plan.card_dates {
        debug!(card_id = %schedule.card_id, start = %schedule.start, due = %schedule.due, "updating card dates");
        target
            .set_card_dates(schedule)
            .await
            .with_context(|| format!("Failed to update dates on card '{}'", schedule.title))?;
    }
    Ok(plan.card_dates.len())
}
