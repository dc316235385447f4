//! Procedurally synthesized stand-ins for the rustle and impact samples, used
//! where no decoded audio assets are available.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const RUSTLE_SECONDS: f32 = 0.35;
const IMPACT_SECONDS: f32 = 0.25;
const IMPACT_HZ: f32 = 90.0;

fn normalize(buf: &mut [f32]) {
    let peak = buf.iter().fold(0.0_f32, |m, v| m.max(v.abs()));
    if peak > 1e-6 {
        for v in buf.iter_mut() {
            *v /= peak;
        }
    }
}

/// Low-passed noise with a fast attack and exponential tail.
pub fn synthesize_rustle(sample_rate: u32) -> Vec<f32> {
    let sr = sample_rate.max(1) as f32;
    let len = (sr * RUSTLE_SECONDS) as usize;
    let mut noise = StdRng::seed_from_u64(0x1234_ABCD);
    let mut out = Vec::with_capacity(len);
    let mut lp = 0.0_f32;
    // one-pole lowpass around 3 kHz keeps it leafy rather than hissy
    let alpha = 1.0 - (-2.0 * std::f32::consts::PI * 3000.0 / sr).exp();
    for i in 0..len {
        let t = i as f32 / sr;
        lp += alpha * (noise.gen_range(-1.0..1.0_f32) - lp);
        let attack = (t / 0.01).min(1.0);
        let decay = (-t / 0.09).exp();
        // slight flutter so consecutive rustles do not sound identical
        let flutter = 0.75 + 0.25 * (t * 2.0 * std::f32::consts::PI * 23.0).sin();
        out.push(lp * attack * decay * flutter);
    }
    normalize(&mut out);
    out
}

/// A short falling thump with a noise transient on top.
pub fn synthesize_impact(sample_rate: u32) -> Vec<f32> {
    let sr = sample_rate.max(1) as f32;
    let len = (sr * IMPACT_SECONDS) as usize;
    let mut noise = StdRng::seed_from_u64(0x7890_FEDC);
    let mut out = Vec::with_capacity(len);
    let mut phase = 0.0_f32;
    for i in 0..len {
        let t = i as f32 / sr;
        let freq = IMPACT_HZ * (1.0 + 0.6 * (-t / 0.03).exp());
        phase += 2.0 * std::f32::consts::PI * freq / sr;
        let body = phase.sin() * (-t / 0.07).exp();
        let crunch = noise.gen_range(-1.0..1.0_f32) * (-t / 0.015).exp() * 0.6;
        out.push(body + crunch);
    }
    normalize(&mut out);
    out
}
