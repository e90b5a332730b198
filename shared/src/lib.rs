//! Board state for the sticky-notes page: note positions, the undo history
//! and every state transition the browser client drives.

pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod history;
pub mod host;
pub mod note;
pub mod storage;
pub mod store;
pub mod text_fit;

pub use config::BoardConfig;
pub use controller::{
    Board, DeleteOutcome, DragState, EditOrigin, EditOutcome, EditingState, KeyOutcome, Modifiers,
    PointerDevice, UndoOutcome,
};
pub use error::{BoardError, BoardResult};
pub use geometry::{Bounds, Footprint, Layout, Point};
pub use history::{ActionDetails, ActionType, History, HistoryEntry};
pub use host::{Host, ManualHost};
pub use note::{ColorClass, Note, NoteId};
pub use storage::{MemoryStorage, Storage};
pub use store::NoteStore;
pub use text_fit::{GridMeasure, InputKind, TextMeasure};
