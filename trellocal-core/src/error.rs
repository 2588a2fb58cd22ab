//! Data errors raised while turning cards into tasks.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("Invalid estimate '{value}' on card '{card}': expected a non-negative number of hours")]
    InvalidEstimate { card: String, value: String },

    #[error("Invalid due date '{value}' on card '{card}': expected an RFC 3339 timestamp")]
    InvalidDueDate { card: String, value: String },

    #[error("Unknown schedule mode '{0}' (expected 'due' or 'slots')")]
    UnknownScheduleMode(String),
}
