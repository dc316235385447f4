//! Time-decayed interaction records.
//!
//! The shader consumes a fixed-width array of indent slots, so indents live in
//! a fixed-capacity ring: pushing into a full ring overwrites the oldest slot,
//! and expiry compacts the ring while preserving creation order.

use crate::constants::{INDENT_CAPACITY, INDENT_DECAY_MS, OFF_FIELD};
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Indent {
    /// Ground-plane position as `(x, z)`.
    pub position: Vec2,
    pub strength: f32,
    pub created_at_ms: f64,
}

impl Indent {
    pub fn new(position: Vec2, strength: f32, created_at_ms: f64) -> Self {
        Self {
            position,
            strength: strength.clamp(0.0, 1.0),
            created_at_ms,
        }
    }

    #[inline]
    pub fn age_ms(&self, now_ms: f64) -> f64 {
        (now_ms - self.created_at_ms).max(0.0)
    }

    #[inline]
    pub fn is_expired(&self, now_ms: f64) -> bool {
        self.age_ms(now_ms) >= INDENT_DECAY_MS
    }

    /// `strength * (1 - age / decay)`, zero once expired. Never written back.
    #[inline]
    pub fn effective_strength(&self, now_ms: f64) -> f32 {
        let age = (self.age_ms(now_ms) / INDENT_DECAY_MS).min(1.0);
        self.strength * (1.0 - age as f32)
    }
}

/// One packed shader slot: `[x, z, strength, 0]`.
pub type IndentSlot = [f32; 4];

#[derive(Clone, Debug)]
pub struct IndentArena {
    slots: [Option<Indent>; INDENT_CAPACITY],
    head: usize,
    len: usize,
}

impl Default for IndentArena {
    fn default() -> Self {
        Self::new()
    }
}

impl IndentArena {
    pub fn new() -> Self {
        Self {
            slots: [None; INDENT_CAPACITY],
            head: 0,
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Record an indent, evicting the oldest one when the ring is full.
    /// Returns the evicted indent, if any.
    pub fn push(&mut self, indent: Indent) -> Option<Indent> {
        if self.len == INDENT_CAPACITY {
            let evicted = self.slots[self.head].replace(indent);
            self.head = (self.head + 1) % INDENT_CAPACITY;
            evicted
        } else {
            let idx = (self.head + self.len) % INDENT_CAPACITY;
            self.slots[idx] = Some(indent);
            self.len += 1;
            None
        }
    }

    /// Drop every indent whose age has reached the decay window.
    /// Returns how many were removed.
    pub fn evict_expired(&mut self, now_ms: f64) -> usize {
        let before = self.len;
        let mut kept = [None; INDENT_CAPACITY];
        let mut n = 0;
        for indent in self.iter() {
            if !indent.is_expired(now_ms) {
                kept[n] = Some(*indent);
                n += 1;
            }
        }
        self.slots = kept;
        self.head = 0;
        self.len = n;
        before - n
    }

    pub fn clear(&mut self) {
        self.slots = [None; INDENT_CAPACITY];
        self.head = 0;
        self.len = 0;
    }

    /// Live indents, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Indent> + '_ {
        (0..self.len).filter_map(move |i| self.slots[(self.head + i) % INDENT_CAPACITY].as_ref())
    }

    /// Live indents with their decayed strength at `now_ms`, oldest first.
    pub fn decayed(&self, now_ms: f64) -> impl Iterator<Item = (Vec2, f32)> + '_ {
        self.iter()
            .map(move |i| (i.position, i.effective_strength(now_ms)))
    }

    /// Pack into the fixed-width upload layout. Unused slots sit off-field
    /// with zero strength.
    pub fn pack(&self, now_ms: f64) -> [IndentSlot; INDENT_CAPACITY] {
        let mut out = [[OFF_FIELD[0], OFF_FIELD[1], 0.0, 0.0]; INDENT_CAPACITY];
        for (slot, (pos, strength)) in out.iter_mut().zip(self.decayed(now_ms)) {
            *slot = [pos.x, pos.y, strength, 0.0];
        }
        out
    }
}
