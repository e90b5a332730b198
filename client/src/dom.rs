use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, HtmlElement, HtmlTextAreaElement, KeyboardEvent, MouseEvent,
    PointerEvent, Window,
};

use stickyboard_shared::{Bounds, Modifiers, NoteId, Point, PointerDevice};

pub const CONTAINER_ID: &str = "notes-container";
pub const DROP_AREA_ID: &str = "drop-area";
pub const PALETTE_ID: &str = "palette";

/// Elements the handlers need, looked up once at startup.
#[derive(Clone)]
pub struct Page {
    pub window: Window,
    pub document: Document,
    pub container: HtmlElement,
    pub palette: HtmlElement,
}

impl Page {
    pub fn new(window: Window, document: Document) -> Result<Self, JsValue> {
        let container = get_element(&document, CONTAINER_ID)?;
        let palette = get_element(&document, PALETTE_ID)?;
        Ok(Self {
            window,
            document,
            container,
            palette,
        })
    }
}

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

/// Viewport rectangle of the drop area.
pub fn measure_bounds(container: &Element) -> Bounds {
    let rect = container.get_bounding_client_rect();
    Bounds::new(rect.left(), rect.top(), rect.width(), rect.height())
}

pub fn event_point(event: &MouseEvent) -> Point {
    Point::new(f64::from(event.client_x()), f64::from(event.client_y()))
}

pub fn pointer_device(event: &PointerEvent) -> PointerDevice {
    match event.pointer_type().as_str() {
        "touch" => PointerDevice::Touch,
        "pen" => PointerDevice::Pen,
        _ => PointerDevice::Mouse,
    }
}

pub fn modifiers(event: &KeyboardEvent) -> Modifiers {
    Modifiers {
        ctrl: event.ctrl_key(),
        meta: event.meta_key(),
        shift: event.shift_key(),
    }
}

pub fn event_element(event: &Event) -> Option<Element> {
    event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
}

/// Background clicks land on the container itself or on the drop area.
pub fn is_board_background(event: &Event) -> bool {
    event_element(event)
        .map(|element| {
            let id = element.id();
            id == CONTAINER_ID || id == DROP_AREA_ID
        })
        .unwrap_or(false)
}

/// The `.note` wrapper the event happened in, if any.
pub fn note_element_from_event(event: &Event) -> Option<Element> {
    event_element(event)?.closest(".note").ok().flatten()
}

pub fn note_id(element: &Element) -> NoteId {
    NoteId::new(element.id())
}

pub fn note_textarea_from_event(event: &Event) -> Option<(NoteId, HtmlTextAreaElement)> {
    let textarea = event_element(event)?
        .dyn_into::<HtmlTextAreaElement>()
        .ok()?;
    let note = textarea.closest(".note").ok().flatten()?;
    Some((note_id(&note), textarea))
}

pub fn note_textarea(document: &Document, id: &NoteId) -> Option<HtmlTextAreaElement> {
    document
        .get_element_by_id(id.as_str())?
        .query_selector(".note-content")
        .ok()
        .flatten()?
        .dyn_into::<HtmlTextAreaElement>()
        .ok()
}
