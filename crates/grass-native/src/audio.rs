// Native audio feedback: a small cpal mixer playing synthesized samples.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use grass_core::feedback::{AudioFeedback, FeedbackPolicy, LoadGate, Playback, SampleKind};
use grass_core::synth::{synthesize_impact, synthesize_rustle};
use grass_core::{FeedbackError, SceneClock};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::sync::{Arc, Mutex};

const MAX_VOICES: usize = 8;

#[derive(Clone)]
struct Voice {
    sample: Arc<[f32]>,
    pos: f32,
    rate: f32,
    gain: f32,
}

impl Voice {
    /// Linear-interpolated next sample, `None` once past the end.
    fn next(&mut self) -> Option<f32> {
        let i = self.pos as usize;
        let a = *self.sample.get(i)?;
        let b = self.sample.get(i + 1).copied().unwrap_or(0.0);
        let frac = self.pos - i as f32;
        self.pos += self.rate;
        Some((a + (b - a) * frac) * self.gain)
    }
}

struct Mixer {
    rustle: Arc<[f32]>,
    impact: Arc<[f32]>,
    voices: SmallVec<[Voice; MAX_VOICES]>,
}

impl Mixer {
    fn new(sample_rate: u32) -> Self {
        Self {
            rustle: synthesize_rustle(sample_rate).into(),
            impact: synthesize_impact(sample_rate).into(),
            voices: SmallVec::new(),
        }
    }

    fn trigger(&mut self, pb: Playback) {
        let sample = match pb.kind {
            SampleKind::Rustle => self.rustle.clone(),
            SampleKind::Impact => self.impact.clone(),
        };
        if self.voices.len() >= MAX_VOICES {
            self.voices.remove(0);
        }
        self.voices.push(Voice {
            sample,
            pos: 0.0,
            rate: pb.rate,
            gain: pb.gain,
        });
    }

    fn mix(&mut self) -> f32 {
        let mut acc = 0.0_f32;
        self.voices.retain(|v| match v.next() {
            Some(s) => {
                acc += s;
                true
            }
            None => false,
        });
        acc.tanh()
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mixer: Arc<Mutex<Mixer>>,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;
    device.build_output_stream(
        config,
        move |data: &mut [T], _| {
            let Ok(mut m) = mixer.lock() else {
                return;
            };
            for frame in data.chunks_mut(channels.max(1)) {
                let v = T::from_sample(m.mix());
                for out in frame.iter_mut() {
                    *out = v;
                }
            }
        },
        |err| log::warn!("audio stream error: {err}"),
        None,
    )
}

fn open_output() -> Result<(cpal::Stream, Arc<Mutex<Mixer>>), FeedbackError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(FeedbackError::NoAudioContext)?;
    let supported = device
        .default_output_config()
        .map_err(|e| FeedbackError::Output(e.to_string()))?;
    let config: cpal::StreamConfig = supported.config();
    let mixer = Arc::new(Mutex::new(Mixer::new(config.sample_rate.0)));
    let stream = match supported.sample_format() {
        cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, mixer.clone()),
        cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, mixer.clone()),
        cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, mixer.clone()),
        other => {
            return Err(FeedbackError::Output(format!(
                "unsupported sample format {other:?}"
            )))
        }
    }
    .map_err(|e| FeedbackError::Output(e.to_string()))?;
    stream
        .play()
        .map_err(|e| FeedbackError::Output(e.to_string()))?;
    log::info!(
        "audio output: {} Hz, {} ch",
        config.sample_rate.0,
        config.channels
    );
    Ok((stream, mixer))
}

struct Output {
    _stream: cpal::Stream,
    mixer: Arc<Mutex<Mixer>>,
}

struct State {
    output: Option<Output>,
    gate: LoadGate,
    policy: FeedbackPolicy,
    clock: SceneClock,
}

/// Lives on the event-loop thread; the cpal callback only sees the mixer.
pub struct NativeFeedback {
    state: RefCell<State>,
}

impl NativeFeedback {
    pub fn new(seed: u64) -> Self {
        Self {
            state: RefCell::new(State {
                output: None,
                gate: LoadGate::default(),
                policy: FeedbackPolicy::new(seed),
                clock: SceneClock::new(),
            }),
        }
    }

    fn trigger(&self, pb: Playback) {
        let st = self.state.borrow();
        if let Some(out) = &st.output {
            if let Ok(mut m) = out.mixer.lock() {
                m.trigger(pb);
            }
        }
    }

    fn is_ready(&self) -> bool {
        self.state.borrow().output.is_some()
    }
}

impl AudioFeedback for NativeFeedback {
    fn initialize(&self) {
        let mut st = self.state.borrow_mut();
        if !st.gate.try_begin() {
            return;
        }
        match open_output() {
            Ok((stream, mixer)) => {
                st.output = Some(Output {
                    _stream: stream,
                    mixer,
                });
                st.gate.finish(true);
            }
            Err(e) => {
                log::warn!("{}", e);
                st.gate.finish(false);
            }
        }
    }

    fn play_rustle(&self, intensity: f32) {
        let pb = {
            let mut st = self.state.borrow_mut();
            let now = st.clock.now_ms();
            st.policy.rustle(now, intensity)
        };
        if let Some(pb) = pb {
            self.trigger(pb);
        }
    }

    fn play_indent(&self) {
        if !self.is_ready() {
            return;
        }
        let pb = self.state.borrow_mut().policy.indent();
        self.trigger(pb);
    }
}
