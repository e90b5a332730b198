use thiserror::Error;

use crate::note::NoteId;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("note {0} not found")]
    NotFound(NoteId),
    #[error("drop area bounds are not available yet")]
    BoundsUnavailable,
    #[error("nothing to undo")]
    HistoryExhausted,
    #[error("note {0} is full")]
    InputOverflow(NoteId),
    #[error("storage failure: {0}")]
    Storage(String),
    #[error("invalid saved notes: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type BoardResult<T> = Result<T, BoardError>;
