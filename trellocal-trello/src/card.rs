//! Trello API shapes and their conversion into tasks.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use trellocal_core::{DataError, Estimate, TaskRecord};

/// A card as returned by `GET /lists/{id}/cards?customFieldItems=true`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub due: Option<String>,
    #[serde(default)]
    pub custom_field_items: Vec<CustomFieldItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldItem {
    pub id_custom_field: String,
    #[serde(default)]
    pub value: Option<CustomFieldValue>,
}

/// Value of a custom field item. Trello sends numbers as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomFieldValue {
    #[serde(default)]
    pub number: Option<serde_json::Value>,
    #[serde(default)]
    pub text: Option<String>,
}

/// A custom field definition on a board.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomField {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct List {
    pub id_board: String,
}

impl Card {
    /// Raw estimate value, if the card has the field set.
    fn estimate_value(&self, estimate_field_id: &str) -> Option<String> {
        let item = self
            .custom_field_items
            .iter()
            .find(|item| item.id_custom_field == estimate_field_id)?;

        let value = item.value.as_ref()?;
        let raw = match &value.number {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            Some(other) => other.to_string(),
            None => value.text.clone().unwrap_or_default(),
        };
        Some(raw)
    }

    fn due_at(&self) -> Result<Option<DateTime<Utc>>, DataError> {
        match self.due.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(|_| DataError::InvalidDueDate {
                    card: self.name.clone(),
                    value: raw.to_string(),
                }),
        }
    }

    /// Convert to a task, reading the estimate from `estimate_field_id`.
    ///
    /// A card without the estimate field gets a zero estimate.
    pub fn to_task(&self, estimate_field_id: &str) -> Result<TaskRecord, DataError> {
        let estimate = match self.estimate_value(estimate_field_id) {
            None => Estimate::ZERO,
            Some(raw) => Estimate::parse_hours(&raw).ok_or_else(|| DataError::InvalidEstimate {
                card: self.name.clone(),
                value: raw.clone(),
            })?,
        };

        Ok(TaskRecord {
            card_id: self.id.clone(),
            title: self.name.clone(),
            due_at: self.due_at()?,
            estimate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    const ESTIMATE: &str = "5f0c0ffee";

    fn card(value: serde_json::Value) -> Card {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn reads_estimate_and_due() {
        let card = card(json!({
            "id": "c1",
            "name": "Write report",
            "due": "2024-01-10T00:00:00.000Z",
            "idBoard": "b1",
            "customFieldItems": [
                { "id": "i1", "idCustomField": "other", "idModel": "c1", "value": { "text": "x" } },
                { "id": "i2", "idCustomField": ESTIMATE, "idModel": "c1", "value": { "number": "2" } }
            ]
        }));

        let task = card.to_task(ESTIMATE).unwrap();

        assert_eq!(task.card_id, "c1");
        assert_eq!(task.title, "Write report");
        assert_eq!(task.due_at, Some(Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap()));
        assert_eq!(task.estimate, Estimate::from_hours(2));
    }

    #[test]
    fn due_with_offset_is_normalized_to_utc() {
        let card = card(json!({
            "id": "c1",
            "name": "Standup",
            "due": "2024-05-13T09:00:00+04:00"
        }));

        let task = card.to_task(ESTIMATE).unwrap();

        assert_eq!(task.due_at, Some(Utc.with_ymd_and_hms(2024, 5, 13, 5, 0, 0).unwrap()));
    }

    #[test]
    fn missing_estimate_is_zero() {
        let card = card(json!({ "id": "c1", "name": "Someday", "due": null, "customFieldItems": [] }));

        let task = card.to_task(ESTIMATE).unwrap();

        assert_eq!(task.estimate, Estimate::ZERO);
        assert_eq!(task.due_at, None);
    }

    #[test]
    fn fractional_and_numeric_estimates() {
        let half = card(json!({
            "id": "c1", "name": "Half",
            "customFieldItems": [{ "idCustomField": ESTIMATE, "value": { "number": "1.5" } }]
        }));
        let numeric = card(json!({
            "id": "c2", "name": "Numeric",
            "customFieldItems": [{ "idCustomField": ESTIMATE, "value": { "number": 3 } }]
        }));

        assert_eq!(half.to_task(ESTIMATE).unwrap().estimate, Estimate::from_minutes(90));
        assert_eq!(numeric.to_task(ESTIMATE).unwrap().estimate, Estimate::from_hours(3));
    }

    #[test]
    fn malformed_estimate_is_a_data_error() {
        let card = card(json!({
            "id": "c1", "name": "Vague",
            "customFieldItems": [{ "idCustomField": ESTIMATE, "value": { "text": "a while" } }]
        }));

        let err = card.to_task(ESTIMATE).unwrap_err();

        assert_eq!(
            err,
            DataError::InvalidEstimate {
                card: "Vague".to_string(),
                value: "a while".to_string()
            }
        );
    }

    #[test]
    fn oversized_estimate_is_a_data_error() {
        for raw in ["1e300", "100000000000"] {
            let card = card(json!({
                "id": "c1", "name": "Forever",
                "due": "2024-01-10T00:00:00.000Z",
                "customFieldItems": [{ "idCustomField": ESTIMATE, "value": { "number": raw } }]
            }));

            let err = card.to_task(ESTIMATE).unwrap_err();

            assert_eq!(
                err,
                DataError::InvalidEstimate {
                    card: "Forever".to_string(),
                    value: raw.to_string()
                }
            );
        }
    }

    #[test]
    fn largest_estimate_still_schedules() {
        let card = card(json!({
            "id": "c1", "name": "Sabbatical",
            "due": "2024-01-10T00:00:00.000Z",
            "customFieldItems": [{ "idCustomField": ESTIMATE, "value": { "number": "8784" } }]
        }));

        let task = card.to_task(ESTIMATE).unwrap();
        let plan = trellocal_core::schedule::by_due_date(&[task], Utc::now());

        assert_eq!(
            plan.events[0].end,
            Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn malformed_due_is_a_data_error() {
        let card = card(json!({ "id": "c1", "name": "Soon", "due": "next tuesday" }));

        let err = card.to_task(ESTIMATE).unwrap_err();

        assert!(matches!(err, DataError::InvalidDueDate { .. }));
    }
}
