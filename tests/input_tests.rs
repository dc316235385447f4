// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use input::*;

#[test]
fn instructions_follow_input_modality() {
    assert_eq!(instructions_text(true), "Tap and drag to touch the grass 🌿");
    assert_eq!(
        instructions_text(false),
        "Move cursor to rustle • Click and drag to touch grass"
    );
}

#[test]
fn pixel_ratio_is_capped_at_two() {
    assert_eq!(capped_pixel_ratio(1.0), 1.0);
    assert_eq!(capped_pixel_ratio(1.5), 1.5);
    assert_eq!(capped_pixel_ratio(3.0), 2.0);
    assert_eq!(capped_pixel_ratio(0.0), 1.0);
    assert_eq!(capped_pixel_ratio(f64::NAN), 1.0);
}

#[test]
fn backing_size_uses_capped_ratio_and_never_zero() {
    assert_eq!(backing_size(800.0, 600.0, 1.0), (800, 600));
    assert_eq!(backing_size(800.0, 600.0, 3.0), (1600, 1200));
    assert_eq!(backing_size(0.0, 0.0, 2.0), (1, 1));
    assert_eq!(backing_size(-5.0, 10.0, 1.0), (1, 10));
}

#[test]
fn client_coordinates_become_element_local() {
    let p = client_to_local(150.0, 80.0, 100.0, 30.0);
    assert_eq!(p, glam::Vec2::new(50.0, 50.0));
}

#[test]
fn seed_attribute_parsing() {
    assert_eq!(parse_seed(None), None);
    assert_eq!(parse_seed(Some("42")), Some(42));
    assert_eq!(parse_seed(Some("  7 ")), Some(7));
    assert_eq!(parse_seed(Some("0xff")), Some(255));
    assert_eq!(parse_seed(Some("0XFF")), Some(255));
    assert_eq!(parse_seed(Some("grass")), None);
    assert_eq!(parse_seed(Some("")), None);
}

#[test]
fn mobile_user_agents_are_recognised() {
    assert!(is_mobile_user_agent(
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)"
    ));
    assert!(is_mobile_user_agent("Mozilla/5.0 (Linux; Android 14; Pixel 8)"));
    assert!(is_mobile_user_agent("Opera/9.80 (J2ME/MIDP; Opera Mini/9.80)"));
    assert!(!is_mobile_user_agent(
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
    ));
}
