//! Core types for trellocal.
//!
//! This crate is shared by the Trello reader, the Google Calendar writer and
//! the CLI:
//! - `TaskRecord` / `Estimate` for cards read from a list
//! - `CalendarEvent` / `NewEvent` for events on the target calendar
//! - `schedule` for turning tasks into events
//! - `source` for the seams each backend implements
//! - `sync` for the clear-then-write pass over the target calendar

pub mod error;
pub mod event;
pub mod schedule;
pub mod source;
pub mod sync;
pub mod task;

pub use error::DataError;
pub use event::{CalendarEvent, NewEvent};
pub use schedule::{CardSchedule, Plan, ScheduleMode, Slot};
pub use source::{CardDates, TaskCalendar, TaskSource};
pub use task::{Estimate, TaskRecord};
