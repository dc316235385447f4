use grass_core::scene::CloudField;
use grass_core::{InteractionTracker, SceneClock};
use grass_render::{FrameParams, GpuState};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub canvas: web::HtmlCanvasElement,
    pub gpu: GpuState<'static>,
    pub tracker: Rc<RefCell<InteractionTracker>>,
    pub clouds: CloudField,
    pub clock: SceneClock,
}

impl FrameContext {
    /// One frame: clock, indent eviction and packing, upload, clouds, draw.
    pub fn frame(&mut self) {
        self.gpu
            .resize_if_needed(self.canvas.width(), self.canvas.height());

        let now_ms = self.clock.now_ms();
        let time_secs = self.clock.elapsed_secs();
        let inputs = self.tracker.borrow_mut().prepare_frame(now_ms);

        self.clouds.advance();
        let clouds = self.clouds.instances();

        let params = FrameParams {
            time_secs,
            inputs: &inputs,
            clouds: &clouds,
        };
        match self.gpu.render(&params) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => self.gpu.reconfigure(),
            Err(e) => log::error!("render error: {:?}", e),
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    layout: &grass_core::scene::SceneLayout,
) -> Option<GpuState<'static>> {
    let target = wgpu::SurfaceTarget::Canvas(canvas.clone());
    match GpuState::new(
        target,
        canvas.width(),
        canvas.height(),
        grass_core::Camera::default(),
        layout,
    )
    .await
    {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

/// Handle to a running animation-frame loop.
pub struct FrameLoop {
    tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
    pending: Rc<Cell<Option<i32>>>,
    ctx: Rc<RefCell<Option<FrameContext>>>,
}

impl FrameLoop {
    /// Cancel the pending frame, then drop the frame context and with it
    /// every GPU resource.
    pub fn stop(&self) {
        if let Some(id) = self.pending.take() {
            if let Some(w) = web::window() {
                _ = w.cancel_animation_frame(id);
            }
        }
        self.tick.borrow_mut().take();
        self.ctx.borrow_mut().take();
    }
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>, pending: &Cell<Option<i32>>) {
    let Some(w) = web::window() else {
        return;
    };
    let slot = tick.borrow();
    if let Some(cb) = slot.as_ref() {
        match w.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => pending.set(Some(id)),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
    }
}

pub fn start_loop(frame_ctx: FrameContext) -> FrameLoop {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let pending = Rc::new(Cell::new(None));
    let ctx = Rc::new(RefCell::new(Some(frame_ctx)));

    let tick_clone = tick.clone();
    let pending_clone = pending.clone();
    let ctx_tick = ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        pending_clone.set(None);
        {
            let mut slot = ctx_tick.borrow_mut();
            let Some(fc) = slot.as_mut() else {
                return;
            };
            fc.frame();
        }
        request_frame(&tick_clone, &pending_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick, &pending);

    FrameLoop { tick, pending, ctx }
}
