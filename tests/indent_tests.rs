// Host-side tests for the fixed-capacity indent ring.

use glam::Vec2;
use grass_core::constants::{INDENT_CAPACITY, INDENT_DECAY_MS, OFF_FIELD};
use grass_core::{Indent, IndentArena};

fn at(x: f32, t: f64) -> Indent {
    Indent::new(Vec2::new(x, 0.0), 1.0, t)
}

#[test]
fn twenty_five_rapid_indents_keep_the_newest_twenty_in_order() {
    let mut arena = IndentArena::new();
    let mut evicted = Vec::new();
    for i in 0..25 {
        if let Some(old) = arena.push(at(i as f32, 0.0)) {
            evicted.push(old.position.x);
        }
    }
    assert_eq!(arena.len(), INDENT_CAPACITY);
    assert_eq!(evicted, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    let xs: Vec<f32> = arena.iter().map(|i| i.position.x).collect();
    let expected: Vec<f32> = (5..25).map(|i| i as f32).collect();
    assert_eq!(xs, expected);
}

#[test]
fn count_never_exceeds_capacity_across_evictions() {
    let mut arena = IndentArena::new();
    for i in 0..100 {
        arena.push(at(i as f32, i as f64 * 50.0));
        arena.evict_expired(i as f64 * 50.0);
        assert!(arena.len() <= INDENT_CAPACITY);
    }
}

#[test]
fn strength_decays_linearly_over_the_window() {
    let indent = Indent::new(Vec2::ZERO, 0.8, 1000.0);
    assert!((indent.effective_strength(1000.0) - 0.8).abs() < 1e-6);
    assert!((indent.effective_strength(2500.0) - 0.4).abs() < 1e-5);
    assert!(!indent.is_expired(1000.0 + INDENT_DECAY_MS - 1.0));
    assert!(indent.is_expired(1000.0 + INDENT_DECAY_MS));
    assert_eq!(indent.effective_strength(1000.0 + INDENT_DECAY_MS), 0.0);
}

#[test]
fn strength_is_clamped_to_unit_range() {
    assert_eq!(Indent::new(Vec2::ZERO, 1.5, 0.0).strength, 1.0);
    assert_eq!(Indent::new(Vec2::ZERO, -0.2, 0.0).strength, 0.0);
}

#[test]
fn eviction_removes_only_expired_and_preserves_order() {
    let mut arena = IndentArena::new();
    arena.push(at(0.0, 0.0));
    arena.push(at(1.0, 1000.0));
    arena.push(at(2.0, 2000.0));
    assert_eq!(arena.evict_expired(3500.0), 1);
    let xs: Vec<f32> = arena.iter().map(|i| i.position.x).collect();
    assert_eq!(xs, vec![1.0, 2.0]);
    // a push after compaction lands after the survivors
    arena.push(at(3.0, 3500.0));
    assert_eq!(arena.iter().last().map(|i| i.position.x), Some(3.0));
}

#[test]
fn packed_slots_are_decayed_and_unused_slots_are_zero() {
    let mut arena = IndentArena::new();
    arena.push(Indent::new(Vec2::new(2.0, 1.0), 1.0, 0.0));
    let slots = arena.pack(1500.0);
    assert_eq!(slots[0][0], 2.0);
    assert_eq!(slots[0][1], 1.0);
    assert!((slots[0][2] - 0.5).abs() < 1e-5);
    for slot in &slots[1..] {
        assert_eq!([slot[0], slot[1]], OFF_FIELD);
        assert_eq!(slot[2], 0.0);
    }
}

#[test]
fn clear_empties_the_ring() {
    let mut arena = IndentArena::new();
    arena.push(at(1.0, 0.0));
    arena.clear();
    assert!(arena.is_empty());
    assert_eq!(arena.iter().count(), 0);
}
