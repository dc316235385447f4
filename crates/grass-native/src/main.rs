use glam::Vec2;
use grass_core::feedback::AudioFeedback;
use grass_core::scene::{build_scene, PerformanceProfile, SceneConfig};
use grass_core::{Camera, InteractionTracker, SceneClock, Viewport};
use grass_render::{FrameParams, GpuState};
use std::sync::Arc;
use winit::{
    dpi::LogicalSize,
    event::*,
    event_loop::EventLoop,
    window::WindowBuilder,
};

mod audio;

use audio::NativeFeedback;

fn viewport_of(size: winit::dpi::PhysicalSize<u32>) -> Viewport {
    Viewport::new(size.width as f32, size.height as f32)
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Touch Grass (native)")
            .with_inner_size(LogicalSize::new(1280.0, 720.0))
            .build(&event_loop)?,
    );
    let size = window.inner_size();
    let logical_width = size.to_logical::<f32>(window.scale_factor()).width;

    let config = SceneConfig {
        profile: PerformanceProfile::detect(false, logical_width),
        seed: rand::random(),
        ..Default::default()
    };
    let layout = build_scene(&config);
    let mut gpu = pollster::block_on(GpuState::new(
        window.clone(),
        size.width,
        size.height,
        Camera::default(),
        &layout,
    ))?;
    let mut clouds = layout.clouds;

    let audio = NativeFeedback::new(config.seed);
    let mut tracker = InteractionTracker::new(Camera::default(), viewport_of(size));
    let clock = SceneClock::new();
    let mut cursor = Vec2::ZERO;
    let mut active_touch: Option<u64> = None;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(size) => {
                gpu.resize_if_needed(size.width, size.height);
                tracker.set_viewport(viewport_of(size));
            }
            WindowEvent::CursorEntered { .. } => audio.initialize(),
            WindowEvent::CursorMoved { position, .. } => {
                cursor = Vec2::new(position.x as f32, position.y as f32);
                tracker.on_pointer_move(cursor, clock.now_ms(), &audio);
            }
            WindowEvent::CursorLeft { .. } => tracker.on_pointer_leave(),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => tracker.on_pointer_down(cursor, clock.now_ms(), &audio),
                ElementState::Released => tracker.on_pointer_up(),
            },
            WindowEvent::Touch(touch) => {
                // single-finger interaction: follow the first contact only
                if active_touch.is_some_and(|id| id != touch.id) {
                    return;
                }
                let p = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                match touch.phase {
                    TouchPhase::Started => {
                        active_touch = Some(touch.id);
                        tracker.on_touch_start(p, clock.now_ms(), &audio);
                    }
                    TouchPhase::Moved => tracker.on_touch_move(p, clock.now_ms(), &audio),
                    TouchPhase::Ended | TouchPhase::Cancelled => {
                        active_touch = None;
                        tracker.on_touch_end();
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                let inputs = tracker.prepare_frame(clock.now_ms());
                clouds.advance();
                let cloud_instances = clouds.instances();
                let params = FrameParams {
                    time_secs: clock.elapsed_secs(),
                    inputs: &inputs,
                    clouds: &cloud_instances,
                };
                match gpu.render(&params) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        gpu.reconfigure()
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("surface out of memory");
                        elwt.exit();
                    }
                    Err(e) => log::error!("render error: {:?}", e),
                }
            }
            _ => {}
        },
        Event::AboutToWait => window.request_redraw(),
        _ => {}
    })?;
    Ok(())
}
