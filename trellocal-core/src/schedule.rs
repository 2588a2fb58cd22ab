//! Turning tasks into calendar events.
//!
//! Two policies are supported:
//! - `ScheduleMode::Due`: each task becomes one event starting at its due
//!   date. Undated tasks are stacked back-to-back from an anchor time.
//! - `ScheduleMode::Slots`: tasks are packed, in list order, into free-time
//!   slots marked on another calendar. A task that does not fit is split
//!   across slots, and the scheduled start/due of every placed task is
//!   reported so it can be written back to the card.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};

use crate::error::DataError;
use crate::event::{CalendarEvent, NewEvent, saturating_add};
use crate::task::{Estimate, TaskRecord};

/// Title of the events that mark free-time slots, unless configured otherwise
pub const DEFAULT_SLOT_EVENT_NAME: &str = "ApexData";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScheduleMode {
    #[default]
    Due,
    Slots,
}

impl FromStr for ScheduleMode {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "due" => Ok(ScheduleMode::Due),
            "slots" => Ok(ScheduleMode::Slots),
            other => Err(DataError::UnknownScheduleMode(other.to_string())),
        }
    }
}

impl fmt::Display for ScheduleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleMode::Due => write!(f, "due"),
            ScheduleMode::Slots => write!(f, "slots"),
        }
    }
}

/// Dates a card was scheduled across: first placement start, last placement end.
#[derive(Debug, Clone, PartialEq)]
pub struct CardSchedule {
    pub card_id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub due: DateTime<Utc>,
}

/// Result of scheduling: what to write, and what could not be placed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    pub events: Vec<NewEvent>,
    pub card_dates: Vec<CardSchedule>,
    /// Tasks (with their remaining estimate) that did not fit anywhere
    pub unscheduled: Vec<TaskRecord>,
}

/// A window of free time to schedule tasks into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Slot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Slot { start, end }
    }

    pub fn length(&self) -> Duration {
        self.end - self.start
    }

    /// Pick slot-marker events named `name` that start at or after `anchor`,
    /// sorted by start time.
    pub fn from_events(events: &[CalendarEvent], name: &str, anchor: DateTime<Utc>) -> Vec<Slot> {
        let mut slots: Vec<Slot> = events
            .iter()
            .filter(|e| e.title == name && e.start >= anchor && e.end >= e.start)
            .map(|e| Slot::new(e.start, e.end))
            .collect();
        slots.sort_by_key(|s| s.start);
        slots
    }
}

/// One event per task, starting at its due date.
///
/// Tasks without a due date are laid out back-to-back from `anchor` in list
/// order, so the mapping stays total and repeatable for a fixed anchor.
pub fn by_due_date(tasks: &[TaskRecord], anchor: DateTime<Utc>) -> Plan {
    let mut cursor = anchor;
    let events = tasks
        .iter()
        .map(|task| {
            let start = match task.due_at {
                Some(due) => due,
                None => {
                    let start = cursor;
                    cursor = saturating_add(start, task.estimate.duration());
                    start
                }
            };
            NewEvent::for_task(task, start, task.estimate.duration())
        })
        .collect();

    Plan {
        events,
        card_dates: Vec::new(),
        unscheduled: Vec::new(),
    }
}

/// Pack tasks into `slots` in list order.
///
/// Within a slot, tasks are placed one after another while they fit. The first
/// task that does not fit is split: the part that fits is placed, the rest
/// carries over, and every later task waits for the next slot. Zero-length
/// parts of a split are dropped.
pub fn into_slots(tasks: &[TaskRecord], slots: &[Slot]) -> Plan {
    let mut queue: VecDeque<(usize, Duration)> = tasks
        .iter()
        .enumerate()
        .map(|(i, t)| (i, t.estimate.duration()))
        .collect();

    let mut events = Vec::new();
    let mut card_dates: Vec<CardSchedule> = Vec::new();
    let mut dates_index: HashMap<usize, usize> = HashMap::new();

    let mut place = |task_index: usize, start: DateTime<Utc>, length: Duration| {
        let task = &tasks[task_index];
        let event = NewEvent::for_task(task, start, length);

        match dates_index.get(&task_index) {
            Some(&i) => card_dates[i].due = event.end,
            None => {
                dates_index.insert(task_index, card_dates.len());
                card_dates.push(CardSchedule {
                    card_id: task.card_id.clone(),
                    title: task.title.clone(),
                    start: event.start,
                    due: event.end,
                });
            }
        }

        events.push(event);
    };

    for slot in slots {
        if queue.is_empty() {
            break;
        }

        let capacity = slot.length();
        let mut used = Duration::zero();

        while let Some(&(task_index, remaining)) = queue.front() {
            let cursor = slot.start + used;

            if used + remaining <= capacity {
                place(task_index, cursor, remaining);
                used += remaining;
                queue.pop_front();
            } else {
                let fits = capacity - used;
                if fits > Duration::zero() {
                    place(task_index, cursor, fits);
                }
                if let Some(front) = queue.front_mut() {
                    front.1 = remaining - fits;
                }
                break;
            }
        }
    }

    let unscheduled = queue
        .into_iter()
        .map(|(i, remaining)| {
            let mut task = tasks[i].clone();
            task.estimate = Estimate::from_duration(remaining);
            task
        })
        .collect();

    Plan {
        events,
        card_dates,
        unscheduled,
    }
}
