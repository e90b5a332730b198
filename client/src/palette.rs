use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement};

use stickyboard_shared::ColorClass;

/// Draws the five color circles once, then keeps the `selected` marker on
/// the current color.
pub fn render_palette(document: &Document, palette_el: &HtmlElement, current: ColorClass) {
    if palette_el.child_element_count() == 0 {
        for color in ColorClass::ALL {
            let Ok(element) = document.create_element("div") else {
                continue;
            };
            let Ok(circle) = element.dyn_into::<HtmlElement>() else {
                continue;
            };
            let number = color.number().to_string();
            circle.set_class_name(&format!("color-circle {}", color.class_name()));
            let _ = circle.set_attribute("data-color", &number);
            let _ = circle.set_attribute("role", "button");
            let _ = circle.set_attribute("title", &format!("Color {number} (press {number})"));
            let _ = circle.style().set_property("background-color", color.css());
            let _ = palette_el.append_child(&circle);
        }
    }
    for color in ColorClass::ALL {
        let selector = format!(".color-circle.{}", color.class_name());
        if let Ok(Some(circle)) = palette_el.query_selector(&selector) {
            let _ = circle
                .class_list()
                .toggle_with_force("selected", color == current);
        }
    }
}

pub fn palette_color_from_event(event: &Event) -> Option<ColorClass> {
    let mut current = event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok());
    while let Some(element) = current {
        if let Some(number) = element.get_attribute("data-color") {
            return number.parse::<u8>().ok().and_then(ColorClass::from_number);
        }
        current = element.parent_element();
    }
    None
}
