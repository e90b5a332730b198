use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Reflect;
use log::{debug, info, warn, LevelFilter};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, FocusEvent, InputEvent, KeyboardEvent, MouseEvent, PointerEvent};

use stickyboard_shared::{
    Board, BoardConfig, DragState, EditOrigin, EditOutcome, InputKind, KeyOutcome,
};

use crate::dom::{
    event_point, is_board_background, measure_bounds, modifiers, note_element_from_event,
    note_id, note_textarea_from_event, pointer_device, Page,
};
use crate::logging;
use crate::palette::palette_color_from_event;
use crate::persistence::LocalStorage;
use crate::render::{fit_text, focus_note, place_note, render_board, shake, DomMeasure};
use crate::util::{debug_enabled, BrowserHost};

type AppBoard = Board<LocalStorage, BrowserHost>;
type SharedBoard = Rc<RefCell<AppBoard>>;

fn document_ready_state(document: &web_sys::Document) -> Option<String> {
    Reflect::get(document.as_ref(), &JsValue::from_str("readyState"))
        .ok()?
        .as_string()
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    let started = Rc::new(Cell::new(false));

    if document_ready_state(&document).as_deref() == Some("complete") {
        started.set(true);
        return start_app();
    }

    let onload_started = started.clone();
    let onload = Closure::<dyn FnMut(Event)>::new(move |_| {
        if onload_started.replace(true) {
            return;
        }
        if let Err(err) = start_app() {
            web_sys::console::error_1(&err);
        }
    });
    window.add_event_listener_with_callback("load", onload.as_ref().unchecked_ref())?;
    onload.forget();

    Ok(())
}

fn start_app() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let level = if debug_enabled(&window) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::init(level);

    let page = Page::new(window.clone(), document)?;
    let config = BoardConfig::default();
    let settle_ms = config.resize_settle_ms;
    let storage = LocalStorage::open(&window);
    let board = Board::open(config, storage, BrowserHost, measure_bounds(&page.container));
    render_board(&page, &board);
    let board: SharedBoard = Rc::new(RefCell::new(board));

    bind_pointer(&page, &board)?;
    bind_text(&page, &board)?;
    bind_keyboard(&page, &board)?;
    bind_palette(&page, &board)?;
    bind_resize(&page, &board, settle_ms)?;

    info!("board ready");
    Ok(())
}

fn bind_pointer(page: &Page, board: &SharedBoard) -> Result<(), JsValue> {
    {
        let page_cb = page.clone();
        let board_cb = board.clone();
        let onpointerdown = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let Some(note_el) = note_element_from_event(&event) else {
                return;
            };
            let id = note_id(&note_el);
            let mut board = board_cb.borrow_mut();
            if note_textarea_from_event(&event).is_some() {
                if let Err(err) = board.bring_to_front(&id) {
                    warn!("{err}");
                }
            } else {
                match board.begin_drag(&id, pointer_device(&event), event_point(&event)) {
                    Ok(true) => {
                        event.prevent_default();
                        let _ = note_el.set_pointer_capture(event.pointer_id());
                    }
                    Ok(false) => {}
                    Err(err) => warn!("{err}"),
                }
            }
            render_board(&page_cb, &*board);
        });
        page.container.add_event_listener_with_callback(
            "pointerdown",
            onpointerdown.as_ref().unchecked_ref(),
        )?;
        onpointerdown.forget();
    }

    {
        let page_cb = page.clone();
        let board_cb = board.clone();
        let onpointermove = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let Ok(mut board) = board_cb.try_borrow_mut() else {
                return;
            };
            let point = event_point(&event);
            board.track_pointer(point);
            let Some(position) = board.drag_to(point) else {
                return;
            };
            if let DragState::Dragging(session) = board.drag() {
                place_note(&page_cb.document, &session.id, position);
            }
            event.prevent_default();
        });
        page.document.add_event_listener_with_callback(
            "pointermove",
            onpointermove.as_ref().unchecked_ref(),
        )?;
        onpointermove.forget();
    }

    {
        let page_cb = page.clone();
        let board_cb = board.clone();
        let onpointerup = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let Ok(mut board) = board_cb.try_borrow_mut() else {
                return;
            };
            let finished = if event.type_() == "pointercancel" {
                board.end_drag()
            } else {
                board.release_pointer(pointer_device(&event))
            };
            if finished.is_some() {
                render_board(&page_cb, &*board);
            }
        });
        page.document
            .add_event_listener_with_callback("pointerup", onpointerup.as_ref().unchecked_ref())?;
        page.document.add_event_listener_with_callback(
            "pointercancel",
            onpointerup.as_ref().unchecked_ref(),
        )?;
        onpointerup.forget();
    }

    {
        let page_cb = page.clone();
        let board_cb = board.clone();
        let onclick = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let focus = {
                let mut board = board_cb.borrow_mut();
                let focus = if is_board_background(&event) {
                    board.create_from_click(event_point(&event));
                    None
                } else if let Some(note_el) = note_element_from_event(&event) {
                    let id = note_id(&note_el);
                    match board.select(&id) {
                        Ok(()) => Some(id),
                        Err(err) => {
                            warn!("{err}");
                            None
                        }
                    }
                } else {
                    None
                };
                render_board(&page_cb, &*board);
                focus
            };
            if let Some(id) = focus {
                focus_note(&page_cb.document, &id);
            }
        });
        page.container
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    Ok(())
}

fn bind_text(page: &Page, board: &SharedBoard) -> Result<(), JsValue> {
    {
        let page_cb = page.clone();
        let board_cb = board.clone();
        let oninput = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some((id, textarea)) = note_textarea_from_event(&event) else {
                return;
            };
            let mut board = board_cb.borrow_mut();
            let measure = DomMeasure::new(&page_cb.document);
            match board.edit_content(&id, &textarea.value(), EditOrigin::User, &measure) {
                Ok(EditOutcome::Overflow { content }) => {
                    textarea.set_value(&content);
                    fit_text(&textarea);
                    if let Some(note_el) = note_element_from_event(&event) {
                        shake(&page_cb.window, &note_el);
                    }
                }
                Ok(_) => {}
                Err(err) => warn!("{err}"),
            }
        });
        page.container
            .add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }

    {
        let page_cb = page.clone();
        let board_cb = board.clone();
        let onbeforeinput = Closure::<dyn FnMut(InputEvent)>::new(move |event: InputEvent| {
            let Some((id, _)) = note_textarea_from_event(&event) else {
                return;
            };
            let kind = InputKind::from_input_type(&event.input_type());
            let blocked = board_cb.borrow_mut().before_input(&id, kind).is_err();
            if blocked {
                event.prevent_default();
                if let Some(note_el) = note_element_from_event(&event) {
                    shake(&page_cb.window, &note_el);
                }
            }
        });
        page.container.add_event_listener_with_callback(
            "beforeinput",
            onbeforeinput.as_ref().unchecked_ref(),
        )?;
        onbeforeinput.forget();
    }

    {
        let page_cb = page.clone();
        let board_cb = board.clone();
        let onfocusin = Closure::<dyn FnMut(FocusEvent)>::new(move |event: FocusEvent| {
            let Some((id, _)) = note_textarea_from_event(&event) else {
                return;
            };
            // Focus can move while another handler is re-rendering.
            let Ok(mut board) = board_cb.try_borrow_mut() else {
                debug!("focus on {id} while the board is busy");
                return;
            };
            match board.begin_editing(&id) {
                Ok(()) => render_board(&page_cb, &*board),
                Err(err) => warn!("{err}"),
            }
        });
        page.container
            .add_event_listener_with_callback("focusin", onfocusin.as_ref().unchecked_ref())?;
        onfocusin.forget();
    }

    {
        let board_cb = board.clone();
        let onfocusout = Closure::<dyn FnMut(FocusEvent)>::new(move |event: FocusEvent| {
            if note_textarea_from_event(&event).is_none() {
                return;
            }
            match board_cb.try_borrow_mut() {
                Ok(mut board) => board.end_editing(),
                Err(_) => debug!("blur while the board is busy"),
            }
        });
        page.container
            .add_event_listener_with_callback("focusout", onfocusout.as_ref().unchecked_ref())?;
        onfocusout.forget();
    }

    Ok(())
}

fn bind_keyboard(page: &Page, board: &SharedBoard) -> Result<(), JsValue> {
    let page_cb = page.clone();
    let board_cb = board.clone();
    let onkeydown = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        let Ok(mut board) = board_cb.try_borrow_mut() else {
            return;
        };
        if board.handle_key(&event.key(), modifiers(&event)) == KeyOutcome::Handled {
            event.prevent_default();
            render_board(&page_cb, &*board);
        }
    });
    page.document
        .add_event_listener_with_callback("keydown", onkeydown.as_ref().unchecked_ref())?;
    onkeydown.forget();
    Ok(())
}

fn bind_palette(page: &Page, board: &SharedBoard) -> Result<(), JsValue> {
    let page_cb = page.clone();
    let board_cb = board.clone();
    let onclick = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let Some(color) = palette_color_from_event(&event) else {
            return;
        };
        let mut board = board_cb.borrow_mut();
        board.set_current_color(color);
        render_board(&page_cb, &*board);
    });
    page.palette
        .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
    onclick.forget();
    Ok(())
}

/// Window resizes are settled for a moment before notes are laid out again.
fn bind_resize(page: &Page, board: &SharedBoard, settle_ms: i32) -> Result<(), JsValue> {
    let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

    let settle_page = page.clone();
    let settle_board = board.clone();
    let settle_pending = pending.clone();
    let onsettle = Closure::<dyn FnMut()>::new(move || {
        settle_pending.set(None);
        let bounds = measure_bounds(&settle_page.container);
        let mut board = settle_board.borrow_mut();
        board.resize(bounds);
        render_board(&settle_page, &*board);
    });

    let window = page.window.clone();
    let onresize = Closure::<dyn FnMut()>::new(move || {
        if let Some(handle) = pending.take() {
            window.clear_timeout_with_handle(handle);
        }
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            onsettle.as_ref().unchecked_ref(),
            settle_ms,
        ) {
            Ok(handle) => pending.set(Some(handle)),
            Err(err) => warn!("cannot schedule relayout: {err:?}"),
        }
    });
    page.window
        .add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
    onresize.forget();
    Ok(())
}
