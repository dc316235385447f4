use crate::input;
use grass_core::Viewport;
use wasm_bindgen::JsValue;
use web_sys as web;

pub const HINT_ELEMENT_ID: &str = "grass-hint";

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Canvas CSS box as the interaction viewport.
pub fn css_viewport(canvas: &web::HtmlCanvasElement) -> Viewport {
    let rect = canvas.get_bounding_client_rect();
    Viewport::new(rect.width() as f32, rect.height() as f32)
}

/// Keep the backing store at CSS size times the (capped) pixel ratio.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> (u32, u32) {
    let dpr = web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    let rect = canvas.get_bounding_client_rect();
    let (w, h) = input::backing_size(rect.width(), rect.height(), dpr);
    if canvas.width() != w {
        canvas.set_width(w);
    }
    if canvas.height() != h {
        canvas.set_height(h);
    }
    (w, h)
}

/// Touch points, `ontouchstart`, or a mobile user agent.
pub fn is_touch_capable(window: &web::Window) -> bool {
    let nav = window.navigator();
    if nav.max_touch_points() > 0 {
        return true;
    }
    let has_ontouchstart =
        js_sys::Reflect::has(window.as_ref(), &JsValue::from_str("ontouchstart")).unwrap_or(false);
    if has_ontouchstart {
        return true;
    }
    nav.user_agent()
        .map(|ua| input::is_mobile_user_agent(&ua))
        .unwrap_or(false)
}

pub fn set_hint(document: &web::Document, touch: bool) {
    if let Some(el) = document.get_element_by_id(HINT_ELEMENT_ID) {
        el.set_text_content(Some(input::instructions_text(touch)));
    }
}
