//! Run configuration from environment variables (optionally via `.env`).

use std::path::PathBuf;

use chrono::{DateTime, NaiveTime, Utc};
use thiserror::Error;
use trellocal_core::ScheduleMode;
use trellocal_core::schedule::DEFAULT_SLOT_EVENT_NAME;

const REQUIRED: &[&str] = &[
    "CALENDAR_MAIN_ID",
    "CALENDAR_TASKS_ID",
    "API_KEY",
    "TOKEN",
    "LIST_ID",
    "ESTIMATE_FIELD_ID",
];

const DEFAULT_CLIENT_SECRET_FILE: &str = "client_secret.json";
const DEFAULT_TOKEN_FILE: &str = "token.toml";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable(s): {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

pub struct Config {
    /// Calendar holding the slot-marker events
    pub calendar_main_id: String,
    /// Dedicated calendar that gets cleared and rewritten
    pub calendar_tasks_id: String,
    pub trello_api_key: String,
    pub trello_token: String,
    pub list_id: String,
    pub estimate_field_id: String,
    pub schedule_mode: ScheduleMode,
    pub schedule_start: Option<DateTime<Utc>>,
    pub slot_event_name: String,
    pub client_secret_file: PathBuf,
    pub token_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let missing: Vec<&'static str> = REQUIRED
            .iter()
            .copied()
            .filter(|key| get(*key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }
        let required = |key: &str| get(key).unwrap_or_default();

        let schedule_mode = match get("SCHEDULE_MODE") {
            Some(raw) => raw
                .parse::<ScheduleMode>()
                .map_err(|e| ConfigError::Invalid {
                    name: "SCHEDULE_MODE",
                    reason: e.to_string(),
                })?,
            None => ScheduleMode::default(),
        };

        let schedule_start = get("SCHEDULE_START")
            .map(|raw| {
                DateTime::parse_from_rfc3339(&raw)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| ConfigError::Invalid {
                        name: "SCHEDULE_START",
                        reason: format!("'{}' is not an RFC 3339 timestamp ({})", raw, e),
                    })
            })
            .transpose()?;

        let config = Config {
            calendar_main_id: required("CALENDAR_MAIN_ID"),
            calendar_tasks_id: required("CALENDAR_TASKS_ID"),
            trello_api_key: required("API_KEY"),
            trello_token: required("TOKEN"),
            list_id: required("LIST_ID"),
            estimate_field_id: required("ESTIMATE_FIELD_ID"),
            schedule_mode,
            schedule_start,
            slot_event_name: get("SLOT_EVENT_NAME")
                .unwrap_or_else(|| DEFAULT_SLOT_EVENT_NAME.to_string()),
            client_secret_file: get("GOOGLE_CLIENT_SECRET_FILE")
                .unwrap_or_else(|| DEFAULT_CLIENT_SECRET_FILE.to_string())
                .into(),
            token_file: get("GOOGLE_TOKEN_FILE")
                .unwrap_or_else(|| DEFAULT_TOKEN_FILE.to_string())
                .into(),
        };

        if config.calendar_tasks_id == config.calendar_main_id {
            return Err(ConfigError::Invalid {
                name: "CALENDAR_TASKS_ID",
                reason: "must differ from CALENDAR_MAIN_ID, every event on it is deleted on each run"
                    .to_string(),
            });
        }

        Ok(config)
    }

    /// Where undated tasks (or slot lookup) start: `SCHEDULE_START`, or
    /// midnight UTC of the day `now` falls on.
    pub fn anchor(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.schedule_start
            .unwrap_or_else(|| now.date_naive().and_time(NaiveTime::MIN).and_utc())
    }
}
