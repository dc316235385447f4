// Host-side tests for rustle throttling, playback policy, the load gate and
// the synthesized fallback samples.

use grass_core::constants::{RUSTLE_GAIN, RUSTLE_THROTTLE_MS};
use grass_core::feedback::{FeedbackPolicy, LoadGate, LoadState, RustleThrottle, SampleKind};
use grass_core::synth::{synthesize_impact, synthesize_rustle};

#[test]
fn two_rustles_within_the_interval_sound_once() {
    let mut throttle = RustleThrottle::default();
    assert!(throttle.admit(1000.0, 0.5).is_some());
    assert!(throttle.admit(1080.0 - 1.0, 0.5).is_none());
}

#[test]
fn two_rustles_100ms_apart_both_sound() {
    let mut throttle = RustleThrottle::default();
    assert!(throttle.admit(1000.0, 0.5).is_some());
    assert!(throttle.admit(1100.0, 0.5).is_some());
}

#[test]
fn quiet_rustles_are_silent_but_consume_the_window() {
    let mut throttle = RustleThrottle::new(RUSTLE_THROTTLE_MS);
    assert!(throttle.admit(0.0, 0.05).is_none());
    assert!(throttle.admit(50.0, 1.0).is_none());
    assert_eq!(throttle.admit(80.0, 1.0), Some(1.0));
}

#[test]
fn rejected_calls_do_not_extend_the_window() {
    let mut throttle = RustleThrottle::default();
    assert!(throttle.admit(0.0, 0.5).is_some());
    assert!(throttle.admit(40.0, 0.5).is_none());
    assert!(throttle.admit(79.0, 0.5).is_none());
    assert!(throttle.admit(80.0, 0.5).is_some());
}

#[test]
fn intensity_is_clamped() {
    let mut throttle = RustleThrottle::default();
    assert_eq!(throttle.admit(0.0, 3.0), Some(1.0));
    assert_eq!(throttle.admit(100.0, f32::NAN), None);
}

#[test]
fn policy_scales_gain_and_varies_pitch_within_range() {
    let mut policy = FeedbackPolicy::new(7);
    let mut now = 0.0;
    for _ in 0..50 {
        let pb = policy.rustle(now, 0.75).expect("admitted");
        assert_eq!(pb.kind, SampleKind::Rustle);
        assert!((pb.gain - 0.75 * RUSTLE_GAIN).abs() < 1e-6);
        assert!((0.9..1.1).contains(&pb.rate));
        now += 100.0;
    }
    for _ in 0..50 {
        let pb = policy.indent();
        assert_eq!(pb.kind, SampleKind::Impact);
        assert_eq!(pb.gain, 0.6);
        assert!((0.95..1.05).contains(&pb.rate));
    }
}

#[test]
fn indent_playback_is_never_throttled() {
    let mut policy = FeedbackPolicy::new(1);
    assert!(policy.rustle(0.0, 1.0).is_some());
    // indents in the same instant still play
    let _ = policy.indent();
    let _ = policy.indent();
    assert!(policy.rustle(10.0, 1.0).is_none());
}

#[test]
fn concurrent_initialize_starts_one_load() {
    let mut gate = LoadGate::default();
    let begun = (0..10).filter(|_| gate.try_begin()).count();
    assert_eq!(begun, 1);
    assert_eq!(gate.state(), LoadState::Loading);
    gate.finish(true);
    assert_eq!(gate.state(), LoadState::Ready);
    assert!(!gate.try_begin());
    assert_eq!(gate.loads_started(), 1);
}

#[test]
fn failed_bring_up_allows_a_retry() {
    let mut gate = LoadGate::default();
    assert!(gate.try_begin());
    gate.finish(false);
    assert_eq!(gate.state(), LoadState::Idle);
    assert!(gate.try_begin());
    assert_eq!(gate.loads_started(), 2);
}

#[test]
fn synthesized_samples_are_finite_and_normalised() {
    for (buf, secs) in [
        (synthesize_rustle(48_000), 0.35_f32),
        (synthesize_impact(48_000), 0.25_f32),
    ] {
        assert_eq!(buf.len(), (48_000.0_f32 * secs) as usize);
        assert!(buf.iter().all(|v| v.is_finite()));
        let peak = buf.iter().fold(0.0_f32, |m, v| m.max(v.abs()));
        assert!(peak <= 1.0 + 1e-6 && peak > 0.5);
    }
}

#[test]
fn synthesized_samples_fade_out() {
    let buf = synthesize_rustle(44_100);
    let tail = &buf[buf.len() - 100..];
    assert!(tail.iter().all(|v| v.abs() < 0.1));
}
