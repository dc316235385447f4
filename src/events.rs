use crate::audio::SoundManager;
use crate::dom;
use crate::input;
use glam::Vec2;
use grass_core::feedback::AudioFeedback;
use grass_core::{InteractionTracker, SceneClock};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

struct Listener {
    target: web::EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

/// Every DOM listener a mounted field registered, so unmount can remove them.
#[derive(Default)]
pub struct Listeners {
    registered: Vec<Listener>,
}

impl Listeners {
    fn add(
        &mut self,
        target: &web::EventTarget,
        kind: &'static str,
        passive: bool,
        handler: impl FnMut(web::Event) + 'static,
    ) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        let opts = web::AddEventListenerOptions::new();
        opts.set_passive(passive);
        let added = target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            closure.as_ref().unchecked_ref(),
            &opts,
        );
        if let Err(e) = added {
            log::warn!("failed to add {} listener: {:?}", kind, e);
            return;
        }
        self.registered.push(Listener {
            target: target.clone(),
            kind,
            closure,
        });
    }

    pub fn remove_all(&mut self) {
        for l in self.registered.drain(..) {
            _ = l
                .target
                .remove_event_listener_with_callback(l.kind, l.closure.as_ref().unchecked_ref());
        }
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }
}

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub tracker: Rc<RefCell<InteractionTracker>>,
    pub audio: SoundManager,
    pub clock: SceneClock,
}

fn mouse_local(ev: &web::Event, canvas: &web::HtmlCanvasElement) -> Option<Vec2> {
    let ev = ev.dyn_ref::<web::MouseEvent>()?;
    let rect = canvas.get_bounding_client_rect();
    Some(input::client_to_local(
        ev.client_x() as f64,
        ev.client_y() as f64,
        rect.left(),
        rect.top(),
    ))
}

/// First active touch; `None` for an empty list.
fn touch_local(ev: &web::Event, canvas: &web::HtmlCanvasElement) -> Option<Vec2> {
    let ev = ev.dyn_ref::<web::TouchEvent>()?;
    let touch = ev.touches().get(0)?;
    let rect = canvas.get_bounding_client_rect();
    Some(input::client_to_local(
        touch.client_x() as f64,
        touch.client_y() as f64,
        rect.left(),
        rect.top(),
    ))
}

pub fn wire_input_handlers(w: &InputWiring, listeners: &mut Listeners) {
    wire_mouse(w, listeners);
    wire_touch(w, listeners);
    wire_resize(w, listeners);
}

fn wire_mouse(w: &InputWiring, listeners: &mut Listeners) {
    let target: &web::EventTarget = w.canvas.as_ref();

    let ww = w.clone();
    listeners.add(target, "mousemove", true, move |ev| {
        if let Some(p) = mouse_local(&ev, &ww.canvas) {
            let now = ww.clock.now_ms();
            ww.tracker.borrow_mut().on_pointer_move(p, now, &ww.audio);
        }
    });

    let ww = w.clone();
    listeners.add(target, "mousedown", true, move |ev| {
        if let Some(p) = mouse_local(&ev, &ww.canvas) {
            let now = ww.clock.now_ms();
            ww.tracker.borrow_mut().on_pointer_down(p, now, &ww.audio);
        }
    });

    let ww = w.clone();
    listeners.add(target, "mouseup", true, move |_| {
        ww.tracker.borrow_mut().on_pointer_up();
    });

    let ww = w.clone();
    listeners.add(target, "mouseleave", true, move |_| {
        ww.tracker.borrow_mut().on_pointer_leave();
    });

    // extra gestures that may unlock audio before the first press
    for kind in ["mouseenter", "click"] {
        let audio = w.audio.clone();
        listeners.add(target, kind, true, move |_| audio.initialize());
    }
}

fn wire_touch(w: &InputWiring, listeners: &mut Listeners) {
    let target: &web::EventTarget = w.canvas.as_ref();

    let ww = w.clone();
    listeners.add(target, "touchstart", false, move |ev| {
        ev.prevent_default();
        if let Some(p) = touch_local(&ev, &ww.canvas) {
            let now = ww.clock.now_ms();
            ww.tracker.borrow_mut().on_touch_start(p, now, &ww.audio);
        }
    });

    let ww = w.clone();
    listeners.add(target, "touchmove", false, move |ev| {
        ev.prevent_default();
        if let Some(p) = touch_local(&ev, &ww.canvas) {
            let now = ww.clock.now_ms();
            ww.tracker.borrow_mut().on_touch_move(p, now, &ww.audio);
        }
    });

    for kind in ["touchend", "touchcancel"] {
        let ww = w.clone();
        listeners.add(target, kind, false, move |ev| {
            ev.prevent_default();
            ww.tracker.borrow_mut().on_touch_end();
        });
    }
}

/// Backing store and tracker viewport follow the CSS box; the frame loop
/// picks the new backing size up on its next tick.
fn wire_resize(w: &InputWiring, listeners: &mut Listeners) {
    let Some(window) = web::window() else {
        return;
    };
    let ww = w.clone();
    listeners.add(window.as_ref(), "resize", true, move |_| {
        dom::sync_canvas_backing_size(&ww.canvas);
        ww.tracker
            .borrow_mut()
            .set_viewport(dom::css_viewport(&ww.canvas));
    });
}
