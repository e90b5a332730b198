use log::{debug, warn};

use crate::error::{BoardError, BoardResult};
use crate::geometry::{from_percent, to_percent, Bounds, Layout, Point};
use crate::host::Host;
use crate::note::{ColorClass, Note, NoteId};

/// Ordered, authoritative collection of live notes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoteStore {
    notes: Vec<Note>,
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_notes(notes: Vec<Note>) -> Self {
        let mut store = Self::new();
        store.replace(notes);
        store
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn snapshot(&self) -> Vec<Note> {
        self.notes.clone()
    }

    /// Replaces every note. Duplicate ids keep their first occurrence.
    pub fn replace(&mut self, notes: Vec<Note>) {
        let mut adopted: Vec<Note> = Vec::with_capacity(notes.len());
        for note in notes {
            if adopted.iter().any(|item| item.id == note.id) {
                warn!("dropping duplicate note id={}", note.id);
                continue;
            }
            adopted.push(note);
        }
        self.notes = adopted;
    }

    pub fn find_by_id(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| &note.id == id)
    }

    fn find_mut(&mut self, id: &NoteId) -> BoardResult<&mut Note> {
        self.notes
            .iter_mut()
            .find(|note| &note.id == id)
            .ok_or_else(|| BoardError::NotFound(id.clone()))
    }

    pub fn highest_z_index(&self) -> i64 {
        self.notes
            .iter()
            .map(|note| note.z_index)
            .max()
            .unwrap_or(0)
            .max(0)
    }

    /// Inserts a new, empty note with its top-left corner at `position`.
    pub fn create(
        &mut self,
        position: Point,
        color: Option<ColorClass>,
        layout: &Layout,
        host: &mut impl Host,
    ) -> Note {
        let color = color.unwrap_or_else(|| ColorClass::from_unit(host.random_unit()));
        let position = layout.clamp(position);
        let percent = percent_if_available(position, layout.bounds);
        let note = Note {
            id: self.next_id(host.now_ms()),
            content: String::new(),
            x: position.x,
            y: position.y,
            x_percent: percent.map(|p| p.x),
            y_percent: percent.map(|p| p.y),
            color_class: color,
            z_index: self.highest_z_index() + 1,
        };
        debug!(
            "created note id={} at ({}, {}) color={}",
            note.id,
            note.x,
            note.y,
            color.class_name()
        );
        self.notes.push(note.clone());
        note
    }

    fn next_id(&self, now_ms: f64) -> NoteId {
        let mut millis = if now_ms.is_finite() && now_ms > 0.0 {
            now_ms as u64
        } else {
            0
        };
        loop {
            let id = NoteId::from_timestamp(millis);
            if self.find_by_id(&id).is_none() {
                return id;
            }
            millis += 1;
        }
    }

    pub fn update_content(&mut self, id: &NoteId, content: &str) -> BoardResult<()> {
        let note = self.find_mut(id)?;
        note.content = content.to_string();
        Ok(())
    }

    /// Sets the absolute position and recomputes the percentage anchors.
    pub fn update_position(
        &mut self,
        id: &NoteId,
        x: f64,
        y: f64,
        bounds: Bounds,
    ) -> BoardResult<()> {
        let note = self.find_mut(id)?;
        note.x = x;
        note.y = y;
        if let Some(percent) = percent_if_available(Point::new(x, y), bounds) {
            note.x_percent = Some(percent.x);
            note.y_percent = Some(percent.y);
        }
        Ok(())
    }

    /// Swaps in `note` for the live note with the same id.
    pub fn replace_note(&mut self, note: Note) -> BoardResult<()> {
        let slot = self.find_mut(&note.id)?;
        *slot = note;
        Ok(())
    }

    pub fn update_z_index(&mut self, id: &NoteId, z_index: i64) -> BoardResult<()> {
        self.find_mut(id)?.z_index = z_index;
        Ok(())
    }

    pub fn bring_to_front(&mut self, id: &NoteId) -> BoardResult<i64> {
        let z_index = self.highest_z_index() + 1;
        self.update_z_index(id, z_index)?;
        Ok(z_index)
    }

    pub fn delete(&mut self, id: &NoteId) -> BoardResult<Note> {
        let index = self
            .notes
            .iter()
            .position(|note| &note.id == id)
            .ok_or_else(|| BoardError::NotFound(id.clone()))?;
        Ok(self.notes.remove(index))
    }

    /// Rederives absolute positions from the percentage anchors for new
    /// bounds. Notes without anchors get them from their current position.
    pub fn relayout(&mut self, layout: &Layout) -> BoardResult<()> {
        if !layout.bounds.is_available() {
            return Err(BoardError::BoundsUnavailable);
        }
        for note in &mut self.notes {
            let percent = match note.percent() {
                Some(percent) => percent,
                None => {
                    let percent = to_percent(layout.clamp(note.position()), layout.bounds);
                    note.x_percent = Some(percent.x);
                    note.y_percent = Some(percent.y);
                    percent
                }
            };
            let position = layout.clamp(from_percent(percent, layout.bounds));
            note.x = position.x;
            note.y = position.y;
        }
        Ok(())
    }

    /// Fills in missing anchors without moving anything.
    pub fn complete_percentages(&mut self, bounds: Bounds) {
        if !bounds.is_available() {
            return;
        }
        for note in &mut self.notes {
            if note.percent().is_none() {
                let percent = to_percent(note.position(), bounds);
                note.x_percent = Some(percent.x);
                note.y_percent = Some(percent.y);
            }
        }
    }
}

fn percent_if_available(position: Point, bounds: Bounds) -> Option<Point> {
    bounds
        .is_available()
        .then(|| to_percent(position, bounds))
}
