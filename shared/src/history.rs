use std::collections::VecDeque;

use log::debug;

use crate::error::{BoardError, BoardResult};
use crate::geometry::Bounds;
use crate::note::{ColorClass, Note, NoteId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionType {
    Load,
    Create,
    Edit,
    Move,
    Delete,
}

impl ActionType {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::Load => "load",
            ActionType::Create => "create",
            ActionType::Edit => "edit",
            ActionType::Move => "move",
            ActionType::Delete => "delete",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ActionDetails {
    Load,
    Create {
        id: NoteId,
        x: f64,
        y: f64,
        color: ColorClass,
    },
    Edit {
        id: NoteId,
        previous: String,
        new: String,
    },
    Move {
        id: NoteId,
        prev_x: f64,
        prev_y: f64,
        new_x: f64,
        new_y: f64,
    },
    Delete {
        note: Note,
    },
}

impl ActionDetails {
    pub fn action_type(&self) -> ActionType {
        match self {
            ActionDetails::Load => ActionType::Load,
            ActionDetails::Create { .. } => ActionType::Create,
            ActionDetails::Edit { .. } => ActionType::Edit,
            ActionDetails::Move { .. } => ActionType::Move,
            ActionDetails::Delete { .. } => ActionType::Delete,
        }
    }
}

/// One point in the linear history. `notes` is the whole board as it looked
/// right after `details` was applied, laid out for `bounds`.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub notes: Vec<Note>,
    pub bounds: Bounds,
    pub details: ActionDetails,
    pub timestamp: f64,
}

impl HistoryEntry {
    pub fn action_type(&self) -> ActionType {
        self.details.action_type()
    }
}

/// Result of a successful [`History::undo`].
pub struct UndoStep<'a> {
    /// Entry the cursor now points at; its snapshot is the state to show.
    pub restored: &'a HistoryEntry,
    /// Entry that was stepped over.
    pub undone: &'a HistoryEntry,
}

#[derive(Clone, Debug)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    current: Option<usize>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            current: None,
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.current.and_then(|index| self.entries.get(index))
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.current, Some(index) if index > 0)
    }

    /// Appends a snapshot. Anything after the cursor is discarded first.
    pub fn record(
        &mut self,
        details: ActionDetails,
        notes: Vec<Note>,
        bounds: Bounds,
        timestamp: f64,
    ) {
        let keep = self.current.map_or(0, |index| index + 1);
        self.entries.truncate(keep);
        let action = details.action_type();
        self.entries.push_back(HistoryEntry {
            notes,
            bounds,
            details,
            timestamp,
        });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.current = Some(self.entries.len() - 1);
        debug!(
            "history recorded {} index={} entries={}",
            action.as_str(),
            self.entries.len() - 1,
            self.entries.len()
        );
    }

    /// Rewrites the snapshot under the cursor after a change that is not an
    /// undo step of its own (z-order, relayout, programmatic writes).
    pub fn amend_current(&mut self, notes: Vec<Note>, bounds: Bounds) {
        if let Some(entry) = self.current.and_then(|index| self.entries.get_mut(index)) {
            entry.notes = notes;
            entry.bounds = bounds;
        }
    }

    pub fn undo(&mut self) -> BoardResult<UndoStep<'_>> {
        let index = match self.current {
            Some(index) if index > 0 => index,
            _ => return Err(BoardError::HistoryExhausted),
        };
        self.current = Some(index - 1);
        debug!(
            "history undo {} now at index={}",
            self.entries[index].action_type().as_str(),
            index - 1
        );
        Ok(UndoStep {
            restored: &self.entries[index - 1],
            undone: &self.entries[index],
        })
    }
}
