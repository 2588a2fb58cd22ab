//! Thin client over the parts of the Trello REST API the tool uses.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use trellocal_core::{CardDates, CardSchedule};

use crate::card::{Card, CustomField, List};
use crate::error::TrelloError;

pub const DEFAULT_BASE_URL: &str = "https://api.trello.com/1";

/// Key/token pair sent as query parameters on every request.
#[derive(Debug, Clone)]
pub struct TrelloAuth {
    pub api_key: String,
    pub token: String,
}

pub struct TrelloClient {
    http: reqwest::Client,
    base_url: String,
    auth: TrelloAuth,
}

impl TrelloClient {
    pub fn new(auth: TrelloAuth) -> Self {
        TrelloClient {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            auth,
        }
    }

    /// Point the client at another API root (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.query(&[("key", &self.auth.api_key), ("token", &self.auth.token)])
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, TrelloError> {
        let response = self.authed(request).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TrelloError::Unauthorized(status.as_u16()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrelloError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// Cards on a list, in list order, with their custom field values.
    pub async fn list_cards(&self, list_id: &str) -> Result<Vec<Card>, TrelloError> {
        debug!(list_id, "fetching Trello cards");
        let request = self
            .http
            .get(self.url(&format!("lists/{}/cards", list_id)))
            .query(&[("customFieldItems", "true")]);
        self.send(request).await
    }

    pub async fn list_board_id(&self, list_id: &str) -> Result<String, TrelloError> {
        let request = self
            .http
            .get(self.url(&format!("lists/{}", list_id)))
            .query(&[("fields", "idBoard")]);
        let list: List = self.send(request).await?;
        Ok(list.id_board)
    }

    /// Custom field definitions on a board.
    pub async fn board_custom_fields(&self, board_id: &str) -> Result<Vec<CustomField>, TrelloError> {
        debug!(board_id, "fetching Trello custom fields");
        let request = self
            .http
            .get(self.url(&format!("boards/{}/customFields", board_id)));
        self.send(request).await
    }

    /// Set a card's start and due dates.
    pub async fn update_card_dates(
        &self,
        card_id: &str,
        start: DateTime<Utc>,
        due: DateTime<Utc>,
    ) -> Result<(), TrelloError> {
        debug!(card_id, %start, %due, "updating Trello card dates");
        let request = self
            .http
            .put(self.url(&format!("cards/{}", card_id)))
            .query(&[
                ("start", start.to_rfc3339_opts(SecondsFormat::Millis, true)),
                ("due", due.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ]);
        let _: serde_json::Value = self.send(request).await?;
        Ok(())
    }
}

impl CardDates for TrelloClient {
    async fn set_card_dates(&self, schedule: &CardSchedule) -> anyhow::Result<()> {
        self.update_card_dates(&schedule.card_id, schedule.start, schedule.due)
            .await?;
        Ok(())
    }
}
