use thiserror::Error;
use trellocal_core::DataError;

#[derive(Error, Debug)]
pub enum TrelloError {
    #[error("Trello rejected the API key or token (HTTP {0})")]
    Unauthorized(u16),

    #[error("Trello API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Request to Trello failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Custom field '{field_id}' is not defined on board '{board_id}'")]
    UnknownCustomField { field_id: String, board_id: String },

    #[error(transparent)]
    Data(#[from] DataError),
}
