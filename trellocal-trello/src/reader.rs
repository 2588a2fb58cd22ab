//! The Trello side of a run: one list, one estimate field.

use tracing::info;
use trellocal_core::{TaskRecord, TaskSource};

use crate::client::TrelloClient;
use crate::error::TrelloError;

pub struct TrelloReader {
    client: TrelloClient,
    list_id: String,
    estimate_field_id: String,
}

impl TrelloReader {
    pub fn new(
        client: TrelloClient,
        list_id: impl Into<String>,
        estimate_field_id: impl Into<String>,
    ) -> Self {
        TrelloReader {
            client,
            list_id: list_id.into(),
            estimate_field_id: estimate_field_id.into(),
        }
    }

    pub fn client(&self) -> &TrelloClient {
        &self.client
    }

    /// Check that the estimate field is defined on the list's board.
    pub async fn verify_estimate_field(&self) -> Result<(), TrelloError> {
        let board_id = self.client.list_board_id(&self.list_id).await?;
        let fields = self.client.board_custom_fields(&board_id).await?;

        if fields.iter().any(|f| f.id == self.estimate_field_id) {
            Ok(())
        } else {
            Err(TrelloError::UnknownCustomField {
                field_id: self.estimate_field_id.clone(),
                board_id,
            })
        }
    }

    pub async fn read_tasks(&self) -> Result<Vec<TaskRecord>, TrelloError> {
        let cards = self.client.list_cards(&self.list_id).await?;

        let tasks = cards
            .iter()
            .map(|card| card.to_task(&self.estimate_field_id))
            .collect::<Result<Vec<_>, _>>()?;

        info!(cards = tasks.len(), list_id = %self.list_id, "read Trello list");
        Ok(tasks)
    }
}

impl TaskSource for TrelloReader {
    async fn fetch_tasks(&self) -> anyhow::Result<Vec<TaskRecord>> {
        Ok(self.read_tasks().await?)
    }
}
