//! Platform-independent half of the audio feedback: the trait the interaction
//! tracker talks to, plus the throttling, gain and pitch rules both hosts share.

use crate::constants::{
    INDENT_GAIN, INDENT_RATE_RANGE, RUSTLE_GAIN, RUSTLE_MIN_INTENSITY, RUSTLE_RATE_RANGE,
    RUSTLE_THROTTLE_MS,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Sink for interaction sounds. Every call is best-effort and must not fail
/// loudly; implementations swallow and log their own errors.
pub trait AudioFeedback {
    /// Lazily bring up the output and load samples. Idempotent.
    fn initialize(&self);
    fn play_rustle(&self, intensity: f32);
    fn play_indent(&self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleKind {
    Rustle,
    Impact,
}

/// What to play: which sample, at what gain and playback rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Playback {
    pub kind: SampleKind,
    pub gain: f32,
    pub rate: f32,
}

/// At most one rustle per interval. Every call inside an open interval
/// consumes it, quiet ones included; those are then dropped.
#[derive(Clone, Copy, Debug)]
pub struct RustleThrottle {
    interval_ms: f64,
    last_fire_ms: Option<f64>,
}

impl Default for RustleThrottle {
    fn default() -> Self {
        Self::new(RUSTLE_THROTTLE_MS)
    }
}

impl RustleThrottle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_fire_ms: None,
        }
    }

    /// Returns the clamped intensity when this call may sound.
    pub fn admit(&mut self, now_ms: f64, intensity: f32) -> Option<f32> {
        if let Some(last) = self.last_fire_ms {
            if now_ms - last < self.interval_ms {
                return None;
            }
        }
        self.last_fire_ms = Some(now_ms);
        let intensity = if intensity.is_finite() {
            intensity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        (intensity >= RUSTLE_MIN_INTENSITY).then_some(intensity)
    }
}

/// Gain/pitch policy shared by the web and native players.
#[derive(Debug)]
pub struct FeedbackPolicy {
    throttle: RustleThrottle,
    rng: StdRng,
}

impl FeedbackPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            throttle: RustleThrottle::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn rustle(&mut self, now_ms: f64, intensity: f32) -> Option<Playback> {
        let intensity = self.throttle.admit(now_ms, intensity)?;
        Some(Playback {
            kind: SampleKind::Rustle,
            gain: intensity * RUSTLE_GAIN,
            rate: self.rate_in(RUSTLE_RATE_RANGE),
        })
    }

    pub fn indent(&mut self) -> Playback {
        Playback {
            kind: SampleKind::Impact,
            gain: INDENT_GAIN,
            rate: self.rate_in(INDENT_RATE_RANGE),
        }
    }

    fn rate_in(&mut self, (lo, hi): (f32, f32)) -> f32 {
        self.rng.gen_range(lo..hi)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
}

/// Guards sample loading so that overlapping `initialize` calls collapse into
/// a single load sequence.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoadGate {
    state: LoadState,
    loads_started: u32,
}

impl LoadGate {
    #[inline]
    pub fn state(&self) -> LoadState {
        self.state
    }

    #[inline]
    pub fn loads_started(&self) -> u32 {
        self.loads_started
    }

    /// `true` only for the caller that moves the gate out of `Idle`.
    pub fn try_begin(&mut self) -> bool {
        if self.state != LoadState::Idle {
            return false;
        }
        self.state = LoadState::Loading;
        self.loads_started += 1;
        true
    }

    /// Finish a load. A failed bring-up (no output at all) re-opens the gate
    /// so the next gesture retries; missing samples still count as ready.
    pub fn finish(&mut self, output_available: bool) {
        self.state = if output_available {
            LoadState::Ready
        } else {
            LoadState::Idle
        };
    }

    pub fn reset(&mut self) {
        self.state = LoadState::Idle;
    }
}
