use std::collections::HashSet;

use log::{debug, info, warn};

use crate::config::BoardConfig;
use crate::error::{BoardError, BoardResult};
use crate::geometry::{center_on, finite_point, to_relative, Bounds, Footprint, Layout, Point};
use crate::history::{ActionDetails, History};
use crate::host::Host;
use crate::note::{ColorClass, Note, NoteId};
use crate::storage::{load_notes, save_notes, Storage};
use crate::store::NoteStore;
use crate::text_fit::{InputKind, TextMeasure};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditingState {
    Idle,
    Editing(NoteId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerDevice {
    Mouse,
    Touch,
    Pen,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    pub id: NoteId,
    pub device: PointerDevice,
    pub start: Point,
    grab_offset: Point,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DragState {
    Idle,
    Dragging(DragSession),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// What the host should do with the key event afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Consumed; suppress the browser default.
    Handled,
    /// Let the default action run.
    PassThrough,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeleteOutcome {
    Deleted(Note),
    /// First press while editing: ordinary text deletion.
    PassThrough,
    /// Nothing selected.
    Ignored,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EditOutcome {
    Unchanged,
    Changed,
    /// Text did not fit; the note now holds `content`.
    Overflow { content: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum UndoOutcome {
    Exhausted,
    /// Only this note's position changed.
    Moved(NoteId),
    Restored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOrigin {
    User,
    Programmatic,
}

/// The whole application state for one board: every event handler goes
/// through one of these methods.
pub struct Board<S: Storage, H: Host> {
    config: BoardConfig,
    storage: S,
    host: H,
    store: NoteStore,
    history: History,
    layout: Layout,
    selected: Option<NoteId>,
    editing: EditingState,
    current_color: ColorClass,
    last_pointer: Point,
    drag: DragState,
    last_delete_press: Option<f64>,
    keystrokes: u32,
    at_limit: HashSet<NoteId>,
}

impl<S: Storage, H: Host> Board<S, H> {
    /// Loads the saved board and seeds the history with it.
    pub fn open(config: BoardConfig, storage: S, host: H, bounds: Bounds) -> Self {
        let notes = match load_notes(&storage, &config.storage_key) {
            Ok(notes) => notes,
            Err(error) => {
                warn!("starting with an empty board: {error}");
                Vec::new()
            }
        };
        let layout = Layout::new(bounds, Footprint::square(config.note_size));
        let mut store = NoteStore::from_notes(notes);
        store.complete_percentages(bounds);
        if bounds.is_available() {
            if let Err(error) = store.relayout(&layout) {
                debug!("skipping initial layout: {error}");
            }
        }
        info!("loaded {} notes", store.len());
        let mut history = History::new(config.max_history);
        history.record(ActionDetails::Load, store.snapshot(), bounds, host.now_ms());
        Self {
            current_color: config.default_color,
            config,
            storage,
            host,
            store,
            history,
            layout,
            selected: None,
            editing: EditingState::Idle,
            last_pointer: Point::default(),
            drag: DragState::Idle,
            last_delete_press: None,
            keystrokes: 0,
            at_limit: HashSet::new(),
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn notes(&self) -> &[Note] {
        self.store.notes()
    }

    pub fn note(&self, id: &NoteId) -> Option<&Note> {
        self.store.find_by_id(id)
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn bounds(&self) -> Bounds {
        self.layout.bounds
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn selected(&self) -> Option<&NoteId> {
        self.selected.as_ref()
    }

    pub fn editing(&self) -> &EditingState {
        &self.editing
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.editing, EditingState::Editing(_))
    }

    pub fn current_color(&self) -> ColorClass {
        self.current_color
    }

    pub fn last_pointer(&self) -> Point {
        self.last_pointer
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging(_))
    }

    pub fn is_at_limit(&self, id: &NoteId) -> bool {
        self.at_limit.contains(id)
    }

    pub fn track_pointer(&mut self, pointer: Point) {
        if let Some(pointer) = finite_point(pointer) {
            self.last_pointer = pointer;
        }
    }

    pub fn set_current_color(&mut self, color: ColorClass) {
        self.current_color = color;
        debug!("color changed to {}", color.class_name());
    }

    /// Creates a note centered on a viewport point. `None` picks a random
    /// palette color.
    pub fn create_at(&mut self, pointer: Point, color: Option<ColorClass>) -> Note {
        let relative = to_relative(pointer, self.layout.bounds.origin());
        let top_left = center_on(relative, self.layout.footprint);
        let note = self
            .store
            .create(top_left, color, &self.layout, &mut self.host);
        self.current_color = note.color_class;
        self.record(ActionDetails::Create {
            id: note.id.clone(),
            x: note.x,
            y: note.y,
            color: note.color_class,
        });
        self.persist();
        note
    }

    /// Click on empty board space.
    pub fn create_from_click(&mut self, pointer: Point) -> Note {
        let color = self.current_color;
        self.create_at(pointer, Some(color))
    }

    /// The `n` shortcut: random color at the last pointer position.
    pub fn create_with_shortcut(&mut self) -> Note {
        let pointer = self.last_pointer;
        self.create_at(pointer, None)
    }

    pub fn select(&mut self, id: &NoteId) -> BoardResult<()> {
        if self.store.find_by_id(id).is_none() {
            return Err(BoardError::NotFound(id.clone()));
        }
        if self.selected.as_ref() != Some(id) {
            debug!("selected note {id}");
        }
        self.selected = Some(id.clone());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Focus entered a note's text field.
    pub fn begin_editing(&mut self, id: &NoteId) -> BoardResult<()> {
        self.select(id)?;
        self.editing = EditingState::Editing(id.clone());
        Ok(())
    }

    /// Focus left a note's text field: flush unconditionally.
    pub fn end_editing(&mut self) {
        self.editing = EditingState::Idle;
        self.keystrokes = 0;
        self.persist();
    }

    pub fn bring_to_front(&mut self, id: &NoteId) -> BoardResult<i64> {
        let z_index = self.store.bring_to_front(id)?;
        self.amend();
        self.persist();
        Ok(z_index)
    }

    pub fn begin_drag(
        &mut self,
        id: &NoteId,
        device: PointerDevice,
        pointer: Point,
    ) -> BoardResult<bool> {
        let Some(pointer) = finite_point(pointer) else {
            debug!("ignoring drag of {id} from a non-finite pointer");
            return Ok(false);
        };
        if let DragState::Dragging(session) = &self.drag {
            debug!(
                "ignoring drag of {id}; {} is already being dragged",
                session.id
            );
            return Ok(false);
        }
        let start = self
            .store
            .find_by_id(id)
            .map(Note::position)
            .ok_or_else(|| BoardError::NotFound(id.clone()))?;
        self.store.bring_to_front(id)?;
        self.amend();
        let relative = to_relative(pointer, self.layout.bounds.origin());
        self.drag = DragState::Dragging(DragSession {
            id: id.clone(),
            device,
            start,
            grab_offset: Point::new(relative.x - start.x, relative.y - start.y),
        });
        Ok(true)
    }

    /// Follows the pointer. No clamping, history or persistence until the
    /// gesture ends.
    pub fn drag_to(&mut self, pointer: Point) -> Option<Point> {
        let DragState::Dragging(session) = &self.drag else {
            return None;
        };
        let pointer = finite_point(pointer)?;
        let relative = to_relative(pointer, self.layout.bounds.origin());
        let position = Point::new(
            relative.x - session.grab_offset.x,
            relative.y - session.grab_offset.y,
        );
        let id = session.id.clone();
        match self
            .store
            .update_position(&id, position.x, position.y, self.layout.bounds)
        {
            Ok(()) => Some(position),
            Err(error) => {
                warn!("dropping drag: {error}");
                self.drag = DragState::Idle;
                None
            }
        }
    }

    /// Pointer up from `device`. Releases from any other device leave the
    /// gesture running.
    pub fn release_pointer(&mut self, device: PointerDevice) -> Option<Note> {
        let dragging = match &self.drag {
            DragState::Dragging(session) => session.device,
            DragState::Idle => return None,
        };
        if dragging != device {
            debug!("{device:?} release ignored; {dragging:?} drag in progress");
            return None;
        }
        self.end_drag()
    }

    /// Gesture finished or cancelled: clamp, record a move if it went far
    /// enough, save.
    pub fn end_drag(&mut self) -> Option<Note> {
        let DragState::Dragging(session) = std::mem::replace(&mut self.drag, DragState::Idle)
        else {
            return None;
        };
        let current = self.store.find_by_id(&session.id)?.position();
        let clamped = self.layout.clamp(current);
        if let Err(error) =
            self.store
                .update_position(&session.id, clamped.x, clamped.y, self.layout.bounds)
        {
            warn!("cannot finish drag: {error}");
            return None;
        }
        let threshold = self.config.move_threshold_px;
        if (session.start.x - clamped.x).abs() > threshold
            || (session.start.y - clamped.y).abs() > threshold
        {
            self.record(ActionDetails::Move {
                id: session.id.clone(),
                prev_x: session.start.x,
                prev_y: session.start.y,
                new_x: clamped.x,
                new_y: clamped.y,
            });
        } else {
            self.amend();
        }
        self.persist();
        self.store.find_by_id(&session.id).cloned()
    }

    /// Applies a text change coming from the note's text field.
    pub fn edit_content(
        &mut self,
        id: &NoteId,
        text: &str,
        origin: EditOrigin,
        measure: &dyn TextMeasure,
    ) -> BoardResult<EditOutcome> {
        let previous = self
            .store
            .find_by_id(id)
            .map(|note| note.content.clone())
            .ok_or_else(|| BoardError::NotFound(id.clone()))?;

        // A rejected keystroke leaves the note exactly as it was, wherever
        // the caret sat.
        let overflow = !measure.fits(id, text);
        let accepted = if overflow {
            self.at_limit.insert(id.clone());
            warn!("{}", BoardError::InputOverflow(id.clone()));
            previous.clone()
        } else {
            self.at_limit.remove(id);
            text.to_string()
        };
        let changed = accepted != previous;
        if changed {
            self.store.update_content(id, &accepted)?;
            match origin {
                EditOrigin::User => self.record(ActionDetails::Edit {
                    id: id.clone(),
                    previous,
                    new: accepted.clone(),
                }),
                EditOrigin::Programmatic => self.amend(),
            }
        }

        if origin == EditOrigin::User {
            self.keystrokes += 1;
            if self.keystrokes >= self.config.autosave_keystrokes {
                self.keystrokes = 0;
                self.persist();
            }
        } else if changed {
            self.persist();
        }

        Ok(if overflow {
            EditOutcome::Overflow { content: accepted }
        } else if changed {
            EditOutcome::Changed
        } else {
            EditOutcome::Unchanged
        })
    }

    /// Gate for pending input on a full note. Deleting always passes and
    /// lifts the block.
    pub fn before_input(&mut self, id: &NoteId, kind: InputKind) -> BoardResult<()> {
        match kind {
            InputKind::Deletion => {
                self.at_limit.remove(id);
                Ok(())
            }
            InputKind::Insertion if self.at_limit.contains(id) => {
                Err(BoardError::InputOverflow(id.clone()))
            }
            InputKind::Insertion => Ok(()),
        }
    }

    pub fn delete_note(&mut self, id: &NoteId) -> BoardResult<Note> {
        let removed = self.store.delete(id)?;
        self.record(ActionDetails::Delete {
            note: removed.clone(),
        });
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        if self.editing == EditingState::Editing(id.clone()) {
            self.editing = EditingState::Idle;
            self.keystrokes = 0;
        }
        if matches!(&self.drag, DragState::Dragging(session) if &session.id == id) {
            self.drag = DragState::Idle;
        }
        self.at_limit.remove(id);
        info!("deleted note {id}; {} notes left", self.store.len());
        self.persist();
        Ok(removed)
    }

    /// Delete/Backspace. The double-press timer is shared by every note.
    pub fn press_delete(&mut self, now_ms: f64) -> DeleteOutcome {
        let Some(id) = self.selected.clone() else {
            return DeleteOutcome::Ignored;
        };
        if self.is_editing() {
            let double = self
                .last_delete_press
                .is_some_and(|last| now_ms - last < self.config.double_delete_ms);
            if !double {
                self.last_delete_press = Some(now_ms);
                return DeleteOutcome::PassThrough;
            }
            self.last_delete_press = None;
            debug!("double delete on {id}");
        }
        match self.delete_note(&id) {
            Ok(note) => DeleteOutcome::Deleted(note),
            Err(error) => {
                warn!("{error}");
                self.selected = None;
                DeleteOutcome::Ignored
            }
        }
    }

    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers) -> KeyOutcome {
        let now = self.host.now_ms();
        if key == "Delete" || key == "Backspace" {
            return match self.press_delete(now) {
                DeleteOutcome::Deleted(_) => KeyOutcome::Handled,
                DeleteOutcome::PassThrough | DeleteOutcome::Ignored => KeyOutcome::PassThrough,
            };
        }
        if self.is_editing() {
            return KeyOutcome::PassThrough;
        }
        if modifiers.command() {
            if key.eq_ignore_ascii_case("z") && !modifiers.shift {
                self.undo();
                return KeyOutcome::Handled;
            }
            return KeyOutcome::PassThrough;
        }
        if key.eq_ignore_ascii_case("n") {
            self.create_with_shortcut();
            return KeyOutcome::Handled;
        }
        if let Some(color) = ColorClass::from_key(key) {
            self.set_current_color(color);
            return KeyOutcome::Handled;
        }
        KeyOutcome::PassThrough
    }

    pub fn undo(&mut self) -> UndoOutcome {
        let (target, bounds, moved) = match self.history.undo() {
            Ok(step) => {
                let moved = match &step.undone.details {
                    ActionDetails::Move { id, .. } => Some(id.clone()),
                    _ => None,
                };
                (step.restored.notes.clone(), step.restored.bounds, moved)
            }
            Err(error) => {
                info!("{error}");
                return UndoOutcome::Exhausted;
            }
        };

        if let Some(id) = moved.filter(|id| self.only_position_differs(&target, id)) {
            if let Some(note) = target.into_iter().find(|note| note.id == id) {
                if let Err(error) = self.store.replace_note(note) {
                    warn!("{error}");
                }
            }
            self.relayout_if_changed(bounds);
            self.amend();
            self.drag = DragState::Idle;
            info!("undid move of {id}");
            self.persist();
            return UndoOutcome::Moved(id);
        }

        self.store.replace(target);
        self.store.complete_percentages(self.layout.bounds);
        self.relayout_if_changed(bounds);
        self.amend();
        self.selected = None;
        self.editing = EditingState::Idle;
        self.drag = DragState::Idle;
        self.at_limit.clear();
        info!("restored {} notes from history", self.store.len());
        self.persist();
        UndoOutcome::Restored
    }

    /// True when `target` matches the live store except for the position of
    /// `id`; the move shortcut is only taken then.
    fn only_position_differs(&self, target: &[Note], id: &NoteId) -> bool {
        let live = self.store.notes();
        live.len() == target.len()
            && live.iter().zip(target).all(|(a, b)| {
                if &a.id == id {
                    a.same_except_position(b)
                } else {
                    a == b
                }
            })
    }

    fn relayout_if_changed(&mut self, snapshot_bounds: Bounds) {
        if snapshot_bounds != self.layout.bounds && self.layout.bounds.is_available() {
            if let Err(error) = self.store.relayout(&self.layout) {
                debug!("skipping relayout after undo: {error}");
            }
        }
    }

    /// Container changed size: rederive positions from percentages.
    pub fn resize(&mut self, bounds: Bounds) {
        self.layout.bounds = bounds;
        match self.store.relayout(&self.layout) {
            Ok(()) => {
                debug!(
                    "relayout for {}x{} ({} notes)",
                    bounds.width,
                    bounds.height,
                    self.store.len()
                );
                self.amend();
                self.persist();
            }
            Err(error) => debug!("skipping relayout: {error}"),
        }
    }

    fn record(&mut self, details: ActionDetails) {
        let now = self.host.now_ms();
        self.history
            .record(details, self.store.snapshot(), self.layout.bounds, now);
    }

    fn amend(&mut self) {
        self.history
            .amend_current(self.store.snapshot(), self.layout.bounds);
    }

    fn persist(&mut self) {
        match save_notes(&mut self.storage, &self.config.storage_key, self.store.notes()) {
            Ok(()) => debug!("notes saved"),
            Err(error) => warn!("failed to save notes: {error}"),
        }
    }
}
