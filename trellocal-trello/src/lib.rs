//! Trello list reader for trellocal.
//!
//! Reads the cards of one list (with their custom field values) and turns
//! them into `TaskRecord`s. Also writes scheduled start/due dates back to
//! cards when the slot scheduler is used.

pub mod card;
pub mod client;
pub mod error;
pub mod reader;

pub use card::{Card, CustomField};
pub use client::{TrelloAuth, TrelloClient};
pub use error::TrelloError;
pub use reader::TrelloReader;
