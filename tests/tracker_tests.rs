// Host-side tests for pointer/touch interaction handling.

use glam::{Mat4, Vec2, Vec3};
use grass_core::constants::OFF_FIELD;
use grass_core::displacement::{displace, DisplacementInputs};
use grass_core::feedback::AudioFeedback;
use grass_core::{Camera, InteractionTracker, Viewport};
use std::cell::RefCell;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Initialize,
    Rustle(f32),
    Indent,
}

#[derive(Default)]
struct Recorder {
    calls: RefCell<Vec<Call>>,
}

impl Recorder {
    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn rustles(&self) -> Vec<f32> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Rustle(i) => Some(*i),
                _ => None,
            })
            .collect()
    }
}

impl AudioFeedback for Recorder {
    fn initialize(&self) {
        self.calls.borrow_mut().push(Call::Initialize);
    }
    fn play_rustle(&self, intensity: f32) {
        self.calls.borrow_mut().push(Call::Rustle(intensity));
    }
    fn play_indent(&self) {
        self.calls.borrow_mut().push(Call::Indent);
    }
}

fn tracker() -> InteractionTracker {
    InteractionTracker::new(Camera::default(), Viewport::new(800.0, 600.0))
}

fn screen(t: &InteractionTracker, x: f32, z: f32) -> Vec2 {
    t.camera()
        .world_to_screen(Vec3::new(x, 0.0, z), &t.viewport())
        .expect("on screen")
}

fn sky(_t: &InteractionTracker) -> Vec2 {
    Vec2::new(400.0, 0.0)
}

fn approx(a: Vec2, b: Vec2) -> bool {
    (a - b).length() < 1e-3
}

#[test]
fn starts_with_pointer_off_field() {
    let t = tracker();
    assert_eq!(t.pointer_ground(), None);
    assert_eq!(t.pointer_uniform(), Vec2::from(OFF_FIELD));
    assert!(!t.is_dragging());
}

#[test]
fn press_creates_a_full_strength_indent_and_plays_impact() {
    let mut t = tracker();
    let audio = Recorder::default();
    let p = screen(&t, 2.0, 1.0);
    t.on_pointer_down(p, 0.0, &audio);

    assert_eq!(audio.calls(), vec![Call::Initialize, Call::Indent]);
    assert!(t.is_dragging());
    assert!(approx(t.drag_anchor().expect("anchor"), Vec2::new(2.0, 1.0)));
    let indents: Vec<_> = t.indents().iter().copied().collect();
    assert_eq!(indents.len(), 1);
    assert!(approx(indents[0].position, Vec2::new(2.0, 1.0)));
    assert_eq!(indents[0].strength, 1.0);
}

#[test]
fn mouse_drag_is_gated_by_distance_from_anchor() {
    let mut t = tracker();
    let audio = Recorder::default();
    t.on_pointer_down(screen(&t, 0.0, 0.0), 0.0, &audio);

    t.on_pointer_move(screen(&t, 0.2, 0.0), 10.0, &audio);
    assert_eq!(t.indents().len(), 1);
    assert!(approx(t.drag_anchor().expect("anchor"), Vec2::ZERO));

    t.on_pointer_move(screen(&t, 0.5, 0.0), 20.0, &audio);
    assert_eq!(t.indents().len(), 2);
    assert!(approx(t.drag_anchor().expect("anchor"), Vec2::new(0.5, 0.0)));
    let last = t.indents().iter().last().copied().expect("indent");
    assert!((last.strength - 0.8).abs() < 1e-6);

    // speed rustle (0.3 * 2) then the fixed drag rustle
    let rustles = audio.rustles();
    assert_eq!(rustles.len(), 2);
    assert!((rustles[0] - 0.6).abs() < 1e-2);
    assert_eq!(rustles[1], 0.5);
}

#[test]
fn touch_uses_the_shorter_threshold_and_no_drag_rustle() {
    let mut t = tracker();
    let audio = Recorder::default();
    t.on_touch_start(screen(&t, 0.0, 0.0), 0.0, &audio);
    assert!(approx(t.pointer_ground().expect("pointer"), Vec2::ZERO));

    t.on_touch_move(screen(&t, 0.27, 0.0), 10.0, &audio);
    assert_eq!(t.indents().len(), 2);
    let rustles = audio.rustles();
    assert_eq!(rustles.len(), 1);
    assert!((rustles[0] - 0.54).abs() < 1e-2);
}

#[test]
fn slow_moves_do_not_rustle() {
    let mut t = tracker();
    let audio = Recorder::default();
    t.on_pointer_move(screen(&t, 1.0, 1.0), 0.0, &audio);
    t.on_pointer_move(screen(&t, 1.01, 1.0), 5.0, &audio);
    assert!(audio.rustles().is_empty());
    assert!(approx(t.pointer_ground().expect("pointer"), Vec2::new(1.01, 1.0)));
}

#[test]
fn hover_moves_never_create_indents() {
    let mut t = tracker();
    let audio = Recorder::default();
    for i in 0..10 {
        t.on_pointer_move(screen(&t, i as f32, 0.0), i as f64, &audio);
    }
    assert!(t.indents().is_empty());
}

#[test]
fn mouse_up_keeps_pointer_but_touch_end_moves_it_off_field() {
    let mut t = tracker();
    let audio = Recorder::default();
    t.on_pointer_down(screen(&t, 1.0, 0.0), 0.0, &audio);
    t.on_pointer_move(screen(&t, 1.0, 0.0), 1.0, &audio);
    t.on_pointer_up();
    assert!(!t.is_dragging());
    assert!(t.pointer_ground().is_some());

    t.on_touch_start(screen(&t, 2.0, 0.0), 2.0, &audio);
    t.on_touch_end();
    assert!(!t.is_dragging());
    assert_eq!(t.pointer_ground(), None);
    assert_eq!(t.pointer_uniform(), Vec2::from(OFF_FIELD));
}

#[test]
fn pointer_leave_ends_drag_and_keeps_position() {
    let mut t = tracker();
    let audio = Recorder::default();
    t.on_pointer_down(screen(&t, 0.0, 0.0), 0.0, &audio);
    t.on_pointer_move(screen(&t, 0.1, 0.0), 1.0, &audio);
    t.on_pointer_leave();
    assert!(!t.is_dragging());
    assert_eq!(t.drag_anchor(), None);
    assert!(approx(t.pointer_ground().expect("pointer"), Vec2::new(0.1, 0.0)));
}

#[test]
fn reset_forgets_indents_drag_and_pointer() {
    let mut t = tracker();
    let audio = Recorder::default();
    t.on_pointer_down(screen(&t, 2.0, 1.0), 0.0, &audio);
    t.on_pointer_move(screen(&t, 3.0, 1.0), 16.0, &audio);
    assert!(!t.indents().is_empty());

    t.reset();
    assert!(t.indents().is_empty());
    assert!(!t.is_dragging());
    assert_eq!(t.drag_anchor(), None);
    assert_eq!(t.pointer_ground(), None);
    assert_eq!(t.pointer_uniform(), Vec2::from(OFF_FIELD));

    // a handler that fires afterwards starts from a clean slate
    t.on_pointer_move(screen(&t, 4.0, 1.0), 32.0, &audio);
    assert!(t.indents().is_empty());
}

#[test]
fn press_in_the_sky_starts_an_anchorless_drag() {
    let mut t = tracker();
    let audio = Recorder::default();
    t.on_pointer_down(sky(&t), 0.0, &audio);
    assert_eq!(audio.calls(), vec![Call::Initialize]);
    assert!(t.is_dragging());
    assert_eq!(t.drag_anchor(), None);

    t.on_pointer_move(screen(&t, 3.0, 0.0), 10.0, &audio);
    assert!(t.indents().is_empty());
}

#[test]
fn moving_off_field_parks_the_pointer() {
    let mut t = tracker();
    let audio = Recorder::default();
    t.on_pointer_move(screen(&t, 1.0, 1.0), 0.0, &audio);
    t.on_pointer_move(sky(&t), 1.0, &audio);
    assert_eq!(t.pointer_ground(), None);
    // re-entering does not count the jump as speed
    t.on_pointer_move(screen(&t, -5.0, 2.0), 2.0, &audio);
    assert!(audio.rustles().is_empty());
}

#[test]
fn press_then_idle_for_the_decay_window_leaves_no_trace() {
    let mut t = tracker();
    let audio = Recorder::default();
    t.on_pointer_down(screen(&t, 2.0, 1.0), 0.0, &audio);
    let frame = t.prepare_frame(0.0);
    assert!((frame.indents[0][2] - 1.0).abs() < 1e-6);

    t.on_pointer_up();
    t.on_pointer_move(sky(&t), 3000.0, &audio);
    let frame = t.prepare_frame(3000.0);
    assert!(t.indents().is_empty());
    assert!(frame.indents.iter().all(|s| s[2] == 0.0));

    // a blade right next to the old indent is only moved by wind
    let blade = Mat4::from_translation(Vec3::new(2.2, 0.0, 1.0));
    let tip = Vec3::new(0.0, 0.6, 0.0);
    let with = DisplacementInputs {
        time: 1.0,
        pointer: frame.pointer,
        indents: &frame.indents,
    };
    let without = DisplacementInputs {
        time: 1.0,
        pointer: frame.pointer,
        indents: &[],
    };
    assert_eq!(displace(&with, tip, &blade), displace(&without, tip, &blade));
}

#[test]
fn viewport_changes_affect_projection() {
    let mut t = tracker();
    let centre_before = t.project(Vec2::new(400.0, 300.0)).expect("hit");
    t.set_viewport(Viewport::new(1600.0, 600.0));
    let centre_after = t.project(Vec2::new(800.0, 300.0)).expect("hit");
    assert!(approx(centre_before, centre_after));
    assert!(t.project(Vec2::new(400.0, 300.0)).expect("hit").x < -0.5);
}
