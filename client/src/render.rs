use std::collections::HashSet;

use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlTextAreaElement, Window};

use stickyboard_shared::{Board, DragState, Host, Note, NoteId, Point, Storage, TextMeasure};

use crate::dom::{note_textarea, Page};
use crate::palette::render_palette;

const SELECTED_CLASS: &str = "selected-note";
const DRAGGING_CLASS: &str = "dragging";
const SHAKE_CLASS: &str = "shake-effect";
const SHAKE_MS: i32 = 500;
const DEFAULT_FONT_PX: f64 = 14.0;
const MIN_FONT_PX: f64 = 12.0;
const FONT_STEP_PX: f64 = 0.5;

pub fn render_board<S: Storage, H: Host>(page: &Page, board: &Board<S, H>) {
    remove_stale_notes(page, board.notes());
    let selected = board.selected();
    let dragging = match board.drag() {
        DragState::Dragging(session) => Some(&session.id),
        DragState::Idle => None,
    };
    for note in board.notes() {
        let element = match page.document.get_element_by_id(note.id.as_str()) {
            Some(element) => element,
            None => match create_note_element(page, note, board.config().note_size) {
                Ok(element) => element,
                Err(err) => {
                    warn!("cannot draw note {}: {err:?}", note.id);
                    continue;
                }
            },
        };
        update_note_element(
            &element,
            note,
            selected == Some(&note.id),
            dragging == Some(&note.id),
        );
    }
    render_palette(&page.document, &page.palette, board.current_color());
}

fn remove_stale_notes(page: &Page, notes: &[Note]) {
    let live: HashSet<&str> = notes.iter().map(|note| note.id.as_str()).collect();
    let Ok(existing) = page.container.query_selector_all(".note") else {
        return;
    };
    for index in 0..existing.length() {
        let Some(element) = existing
            .item(index)
            .and_then(|node| node.dyn_into::<Element>().ok())
        else {
            continue;
        };
        if !live.contains(element.id().as_str()) {
            element.remove();
        }
    }
}

fn create_note_element(page: &Page, note: &Note, size: f64) -> Result<Element, JsValue> {
    let element = page
        .document
        .create_element("div")?
        .dyn_into::<HtmlElement>()?;
    element.set_id(note.id.as_str());
    let style = element.style();
    style.set_property("width", &format!("{size}px"))?;
    style.set_property("min-height", &format!("{size}px"))?;

    let header = page.document.create_element("div")?;
    header.set_class_name("note-header");
    let textarea = page
        .document
        .create_element("textarea")?
        .dyn_into::<HtmlTextAreaElement>()?;
    textarea.set_class_name("note-content");
    textarea.set_placeholder("Write your note here...");

    element.append_child(&header)?;
    element.append_child(&textarea)?;
    page.container.append_child(&element)?;
    Ok(element.into())
}

fn update_note_element(element: &Element, note: &Note, selected: bool, dragging: bool) {
    let mut class_name = format!("note {}", note.color_class.class_name());
    if selected {
        class_name.push(' ');
        class_name.push_str(SELECTED_CLASS);
    }
    if dragging {
        class_name.push(' ');
        class_name.push_str(DRAGGING_CLASS);
    }
    if element.class_list().contains(SHAKE_CLASS) {
        class_name.push(' ');
        class_name.push_str(SHAKE_CLASS);
    }
    if element.class_name() != class_name {
        element.set_class_name(&class_name);
    }
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        let style = html.style();
        let _ = style.set_property("left", &format!("{}px", note.x));
        let _ = style.set_property("top", &format!("{}px", note.y));
        let _ = style.set_property("z-index", &note.z_index.to_string());
    }
    let textarea = element
        .query_selector(".note-content")
        .ok()
        .flatten()
        .and_then(|node| node.dyn_into::<HtmlTextAreaElement>().ok());
    if let Some(textarea) = textarea {
        if textarea.value() != note.content {
            textarea.set_value(&note.content);
            fit_text(&textarea);
        }
    }
}

/// Moves one note without touching anything else; used while dragging.
pub fn place_note(document: &Document, id: &NoteId, position: Point) {
    let Some(element) = document
        .get_element_by_id(id.as_str())
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    let style = element.style();
    let _ = style.set_property("left", &format!("{}px", position.x));
    let _ = style.set_property("top", &format!("{}px", position.y));
}

pub fn focus_note(document: &Document, id: &NoteId) {
    if let Some(textarea) = note_textarea(document, id) {
        let _ = textarea.focus();
    }
}

/// Shrinks the font in half-pixel steps down to the minimum. Returns whether
/// the text fits at the size it ended on.
pub fn fit_text(textarea: &HtmlTextAreaElement) -> bool {
    let style = textarea.style();
    let mut size = DEFAULT_FONT_PX;
    let _ = style.set_property("font-size", &format!("{size}px"));
    if textarea.value().is_empty() {
        return true;
    }
    while overflows(textarea) && size > MIN_FONT_PX {
        size -= FONT_STEP_PX;
        let _ = style.set_property("font-size", &format!("{size}px"));
    }
    !overflows(textarea)
}

fn overflows(textarea: &HtmlTextAreaElement) -> bool {
    textarea.scroll_height() > textarea.client_height()
}

pub fn shake(window: &Window, element: &Element) {
    let classes = element.class_list();
    let _ = classes.remove_1(SHAKE_CLASS);
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        // Forces a reflow so the animation restarts.
        let _ = html.offset_width();
    }
    let _ = classes.add_1(SHAKE_CLASS);
    let element = element.clone();
    let done = Closure::once_into_js(move || {
        let _ = element.class_list().remove_1(SHAKE_CLASS);
    });
    let _ = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(done.unchecked_ref(), SHAKE_MS);
}

/// Measures against the note's real textarea. Leaves `text` in the field.
pub struct DomMeasure<'a> {
    document: &'a Document,
}

impl<'a> DomMeasure<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }
}

impl TextMeasure for DomMeasure<'_> {
    fn fits(&self, id: &NoteId, text: &str) -> bool {
        let Some(textarea) = note_textarea(self.document, id) else {
            return true;
        };
        if textarea.value() != text {
            textarea.set_value(text);
        }
        fit_text(&textarea)
    }
}
