//! Pointer/touch interaction state: ground projection, drag sessions and the
//! indent ring the displacement shader reads every frame.

use crate::constants::{
    DRAG_MIN_DISTANCE_MOUSE, DRAG_MIN_DISTANCE_TOUCH, INDENT_CAPACITY, INDENT_STRENGTH_DRAG,
    INDENT_STRENGTH_PRESS, OFF_FIELD, RUSTLE_DRAG_INTENSITY, RUSTLE_SPEED_GAIN,
    RUSTLE_SPEED_THRESHOLD,
};
use crate::feedback::AudioFeedback;
use crate::indent::{Indent, IndentArena, IndentSlot};
use crate::projection::{project_to_ground, Camera, Viewport};
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Mouse,
    Touch,
}

impl InputKind {
    #[inline]
    fn drag_min_distance(self) -> f32 {
        match self {
            InputKind::Mouse => DRAG_MIN_DISTANCE_MOUSE,
            InputKind::Touch => DRAG_MIN_DISTANCE_TOUCH,
        }
    }
}

/// Snapshot uploaded to the displacement model once per frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameInputs {
    pub pointer: Vec2,
    pub indents: [IndentSlot; INDENT_CAPACITY],
}

#[derive(Clone, Debug)]
pub struct InteractionTracker {
    camera: Camera,
    viewport: Viewport,
    indents: IndentArena,
    pointer: Vec2,
    last_pointer: Vec2,
    dragging: bool,
    drag_anchor: Option<Vec2>,
}

#[inline]
fn off_field() -> Vec2 {
    Vec2::from(OFF_FIELD)
}

#[inline]
fn is_on_field(p: Vec2) -> bool {
    p != off_field()
}

impl InteractionTracker {
    pub fn new(camera: Camera, viewport: Viewport) -> Self {
        Self {
            camera,
            viewport,
            indents: IndentArena::new(),
            pointer: off_field(),
            last_pointer: off_field(),
            dragging: false,
            drag_anchor: None,
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn indents(&self) -> &IndentArena {
        &self.indents
    }

    /// Live pointer ground position, `None` while off-field.
    pub fn pointer_ground(&self) -> Option<Vec2> {
        is_on_field(self.pointer).then_some(self.pointer)
    }

    /// Raw pointer uniform value (the off-field sentinel included).
    #[inline]
    pub fn pointer_uniform(&self) -> Vec2 {
        self.pointer
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    #[inline]
    pub fn drag_anchor(&self) -> Option<Vec2> {
        self.drag_anchor
    }

    pub fn project(&self, screen: Vec2) -> Option<Vec2> {
        project_to_ground(screen, &self.camera, &self.viewport)
    }

    pub fn on_pointer_down(&mut self, screen: Vec2, now_ms: f64, audio: &dyn AudioFeedback) {
        self.begin_press(screen, now_ms, audio, InputKind::Mouse);
    }

    pub fn on_pointer_move(&mut self, screen: Vec2, now_ms: f64, audio: &dyn AudioFeedback) {
        self.track_move(screen, now_ms, audio, InputKind::Mouse);
    }

    /// Ends the drag; a hovering mouse keeps bending the grass under it.
    pub fn on_pointer_up(&mut self) {
        self.end_drag();
    }

    /// Ends the drag but leaves the last pointer position in place.
    pub fn on_pointer_leave(&mut self) {
        self.end_drag();
    }

    pub fn on_touch_start(&mut self, screen: Vec2, now_ms: f64, audio: &dyn AudioFeedback) {
        self.begin_press(screen, now_ms, audio, InputKind::Touch);
    }

    pub fn on_touch_move(&mut self, screen: Vec2, now_ms: f64, audio: &dyn AudioFeedback) {
        self.track_move(screen, now_ms, audio, InputKind::Touch);
    }

    /// Touch has no hover state, so the pointer leaves the field and the
    /// bend fades out.
    pub fn on_touch_end(&mut self) {
        self.end_drag();
        self.pointer = off_field();
        self.last_pointer = off_field();
    }

    /// Forget every indent, the drag session and the pointer. Used on teardown
    /// so no handler that is still queued acts on stale state.
    pub fn reset(&mut self) {
        self.indents.clear();
        self.end_drag();
        self.pointer = off_field();
        self.last_pointer = off_field();
    }

    /// Evict expired indents, then pack the state the shader needs. Eviction
    /// always precedes packing so stale indents never reach a frame.
    pub fn prepare_frame(&mut self, now_ms: f64) -> FrameInputs {
        self.indents.evict_expired(now_ms);
        FrameInputs {
            pointer: self.pointer,
            indents: self.indents.pack(now_ms),
        }
    }

    fn begin_press(
        &mut self,
        screen: Vec2,
        now_ms: f64,
        audio: &dyn AudioFeedback,
        kind: InputKind,
    ) {
        audio.initialize();
        self.dragging = true;
        let Some(hit) = self.project(screen) else {
            return;
        };
        self.drag_anchor = Some(hit);
        if kind == InputKind::Touch {
            self.pointer = hit;
            self.last_pointer = hit;
        }
        self.add_indent(hit, INDENT_STRENGTH_PRESS, now_ms);
        audio.play_indent();
    }

    fn track_move(
        &mut self,
        screen: Vec2,
        now_ms: f64,
        audio: &dyn AudioFeedback,
        kind: InputKind,
    ) {
        let Some(hit) = self.project(screen) else {
            self.pointer = off_field();
            self.last_pointer = off_field();
            return;
        };
        let previous = self.last_pointer;
        self.pointer = hit;
        self.last_pointer = hit;

        // speed is undefined when re-entering from off-field
        if is_on_field(previous) {
            let speed = hit.distance(previous);
            if speed > RUSTLE_SPEED_THRESHOLD {
                audio.play_rustle((speed * RUSTLE_SPEED_GAIN).min(1.0));
            }
        }

        if !self.dragging {
            return;
        }
        if let Some(anchor) = self.drag_anchor {
            if hit.distance(anchor) > kind.drag_min_distance() {
                self.add_indent(hit, INDENT_STRENGTH_DRAG, now_ms);
                self.drag_anchor = Some(hit);
                if kind == InputKind::Mouse {
                    audio.play_rustle(RUSTLE_DRAG_INTENSITY);
                }
            }
        }
    }

    fn end_drag(&mut self) {
        self.dragging = false;
        self.drag_anchor = None;
    }

    fn add_indent(&mut self, position: Vec2, strength: f32, now_ms: f64) {
        if let Some(evicted) = self.indents.push(Indent::new(position, strength, now_ms)) {
            log::debug!(
                "[indent] ring full, evicted ({:.2},{:.2})",
                evicted.position.x,
                evicted.position.y
            );
        }
    }
}
