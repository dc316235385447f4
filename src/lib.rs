#![cfg(target_arch = "wasm32")]
use grass_core::constants::{CANVAS_ELEMENT_ID, INDENT_URL, RUSTLE_URL};
use grass_core::scene::{build_scene, PerformanceProfile, SceneConfig};
use grass_core::{Camera, InteractionTracker, SceneClock};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod dom;
mod events;
mod frame;
mod input;

use audio::SoundManager;

#[derive(Default)]
struct Mounted {
    listeners: events::Listeners,
    frame_loop: Option<frame::FrameLoop>,
    audio: Option<SoundManager>,
    tracker: Option<Rc<RefCell<InteractionTracker>>>,
    unmounted: bool,
}

/// Owner of one mounted grass field. Freeing the handle unmounts the field.
#[wasm_bindgen]
pub struct GrassFieldHandle {
    inner: Rc<RefCell<Mounted>>,
}

#[wasm_bindgen]
impl GrassFieldHandle {
    /// Remove listeners, cancel the frame loop, release the GPU, clear the
    /// interaction state, then close audio. Safe to call more than once.
    pub fn unmount(&self) {
        let mut m = self.inner.borrow_mut();
        if m.unmounted {
            return;
        }
        m.unmounted = true;
        m.listeners.remove_all();
        if let Some(fl) = m.frame_loop.take() {
            fl.stop();
        }
        if let Some(tracker) = m.tracker.take() {
            tracker.borrow_mut().reset();
        }
        if let Some(audio) = m.audio.take() {
            audio.dispose();
        }
        log::info!("grass field unmounted");
    }
}

impl Drop for GrassFieldHandle {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("touchgrass-web starting");

    let has_canvas = dom::window_document()
        .and_then(|d| d.get_element_by_id(CANVAS_ELEMENT_ID))
        .is_some();
    if has_canvas {
        // auto-mounted field lives as long as the page
        std::mem::forget(mount(CANVAS_ELEMENT_ID)?);
    }
    Ok(())
}

fn scene_config(window: &web::Window, canvas: &web::HtmlCanvasElement, touch: bool) -> SceneConfig {
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0) as f32;
    let seed = input::parse_seed(canvas.get_attribute("data-seed").as_deref())
        .unwrap_or_else(rand::random);
    SceneConfig {
        profile: PerformanceProfile::detect(touch, width),
        seed,
        rustle_url: RUSTLE_URL.to_string(),
        indent_url: INDENT_URL.to_string(),
    }
}

/// Attach a grass field to the canvas with the given element id.
#[wasm_bindgen]
pub fn mount(canvas_id: &str) -> Result<GrassFieldHandle, JsValue> {
    let window = web::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{}", canvas_id)))?
        .dyn_into()
        .map_err(|_| JsValue::from_str(&format!("#{} is not a canvas", canvas_id)))?;

    let touch = dom::is_touch_capable(&window);
    dom::set_hint(&document, touch);
    dom::sync_canvas_backing_size(&canvas);

    let config = scene_config(&window, &canvas, touch);
    let clock = SceneClock::new();
    let audio = SoundManager::new(config.seed, &config.rustle_url, &config.indent_url);
    let tracker = Rc::new(RefCell::new(InteractionTracker::new(
        Camera::default(),
        dom::css_viewport(&canvas),
    )));

    let inner = Rc::new(RefCell::new(Mounted {
        audio: Some(audio.clone()),
        tracker: Some(tracker.clone()),
        ..Default::default()
    }));
    {
        let wiring = events::InputWiring {
            canvas: canvas.clone(),
            tracker: tracker.clone(),
            audio,
            clock,
        };
        let mut m = inner.borrow_mut();
        events::wire_input_handlers(&wiring, &mut m.listeners);
        log::info!("{} listeners on #{}", m.listeners.len(), canvas_id);
    }

    let mounted = inner.clone();
    spawn_local(async move {
        if let Err(e) = init(canvas, config, tracker, clock, mounted).await {
            log::error!("init error: {:?}", e);
        }
    });

    Ok(GrassFieldHandle { inner })
}

async fn init(
    canvas: web::HtmlCanvasElement,
    config: SceneConfig,
    tracker: Rc<RefCell<InteractionTracker>>,
    clock: SceneClock,
    mounted: Rc<RefCell<Mounted>>,
) -> anyhow::Result<()> {
    let layout = build_scene(&config);
    let gpu = frame::init_gpu(&canvas, &layout)
        .await
        .ok_or_else(|| anyhow::anyhow!("no render context"))?;

    let mut m = mounted.borrow_mut();
    if m.unmounted {
        // torn down while the device was being acquired
        return Ok(());
    }
    m.frame_loop = Some(frame::start_loop(frame::FrameContext {
        canvas,
        gpu,
        tracker,
        clouds: layout.clouds,
        clock,
    }));
    Ok(())
}
