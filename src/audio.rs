//! WebAudio playback of the rustle and impact samples.

use grass_core::feedback::{AudioFeedback, FeedbackPolicy, LoadGate, Playback, SampleKind};
use grass_core::{FeedbackError, SceneClock};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

struct AudioState {
    ctx: Option<web::AudioContext>,
    gate: LoadGate,
    rustle: Option<web::AudioBuffer>,
    impact: Option<web::AudioBuffer>,
    policy: FeedbackPolicy,
    clock: SceneClock,
    rustle_url: String,
    indent_url: String,
    disposed: bool,
}

/// Cheap to clone; all clones share one context and one set of buffers.
#[derive(Clone)]
pub struct SoundManager {
    state: Rc<RefCell<AudioState>>,
}

fn create_gain(audio_ctx: &web::AudioContext, value: f32) -> Option<web::GainNode> {
    match web::GainNode::new(audio_ctx) {
        Ok(g) => {
            g.gain().set_value(value);
            Some(g)
        }
        Err(e) => {
            log::warn!("{}", FeedbackError::Output(format!("GainNode: {:?}", e)));
            None
        }
    }
}

/// Kick the context out of `suspended`; browsers only allow it after a gesture.
fn resume_if_suspended(ctx: &web::AudioContext) {
    if ctx.state() != web::AudioContextState::Suspended {
        return;
    }
    match ctx.resume() {
        Ok(promise) => spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::warn!("{}", FeedbackError::Resume(format!("{:?}", e)));
            }
        }),
        Err(e) => log::warn!("{}", FeedbackError::Resume(format!("{:?}", e))),
    }
}

async fn load_buffer(
    ctx: &web::AudioContext,
    url: &str,
) -> Result<web::AudioBuffer, FeedbackError> {
    let fetch_err = |reason: String| FeedbackError::Fetch {
        url: url.to_string(),
        reason,
    };
    let window = web::window().ok_or_else(|| fetch_err("no window".into()))?;
    let resp = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| fetch_err(format!("{:?}", e)))?;
    let resp: web::Response = resp
        .dyn_into()
        .map_err(|e| fetch_err(format!("{:?}", e)))?;
    if !resp.ok() {
        return Err(fetch_err(format!("HTTP {}", resp.status())));
    }
    let body = resp.array_buffer().map_err(|e| fetch_err(format!("{:?}", e)))?;
    let body = JsFuture::from(body)
        .await
        .map_err(|e| fetch_err(format!("{:?}", e)))?;
    let decode_err = |reason: String| FeedbackError::Decode {
        url: url.to_string(),
        reason,
    };
    let array: js_sys::ArrayBuffer = body
        .dyn_into()
        .map_err(|e| decode_err(format!("{:?}", e)))?;
    let decoded = ctx
        .decode_audio_data(&array)
        .map_err(|e| decode_err(format!("{:?}", e)))?;
    let decoded = JsFuture::from(decoded)
        .await
        .map_err(|e| decode_err(format!("{:?}", e)))?;
    decoded
        .dyn_into::<web::AudioBuffer>()
        .map_err(|e| decode_err(format!("{:?}", e)))
}

impl SoundManager {
    pub fn new(seed: u64, rustle_url: &str, indent_url: &str) -> Self {
        Self {
            state: Rc::new(RefCell::new(AudioState {
                ctx: None,
                gate: LoadGate::default(),
                rustle: None,
                impact: None,
                policy: FeedbackPolicy::new(seed),
                clock: SceneClock::new(),
                rustle_url: rustle_url.to_string(),
                indent_url: indent_url.to_string(),
                disposed: false,
            })),
        }
    }

    /// Context handle, created on first use and resumed when suspended.
    fn context(&self) -> Result<web::AudioContext, FeedbackError> {
        let mut st = self.state.borrow_mut();
        let ctx = match &st.ctx {
            Some(ctx) => ctx.clone(),
            None => {
                let ctx = web::AudioContext::new().map_err(|_| FeedbackError::NoAudioContext)?;
                st.ctx = Some(ctx.clone());
                ctx
            }
        };
        drop(st);
        resume_if_suspended(&ctx);
        Ok(ctx)
    }

    fn play(&self, ctx: &web::AudioContext, buffer: &web::AudioBuffer, pb: Playback) {
        let source = match ctx.create_buffer_source() {
            Ok(s) => s,
            Err(e) => {
                log::warn!("{}", FeedbackError::Output(format!("{:?}", e)));
                return;
            }
        };
        source.set_buffer(Some(buffer));
        source.playback_rate().set_value(pb.rate);
        let Some(gain) = create_gain(ctx, pb.gain) else {
            return;
        };
        let routed = source
            .connect_with_audio_node(&gain)
            .and_then(|_| gain.connect_with_audio_node(&ctx.destination()))
            .and_then(|_| source.start());
        if let Err(e) = routed {
            log::warn!("{}", FeedbackError::Output(format!("{:?} playback: {:?}", pb.kind, e)));
        }
    }

    /// Ready context plus the buffer for `kind`, if both exist.
    fn ready(&self, kind: SampleKind) -> Option<(web::AudioContext, web::AudioBuffer)> {
        let st = self.state.borrow();
        if st.disposed {
            return None;
        }
        let buffer = match kind {
            SampleKind::Rustle => st.rustle.clone()?,
            SampleKind::Impact => st.impact.clone()?,
        };
        let ctx = st.ctx.clone()?;
        drop(st);
        resume_if_suspended(&ctx);
        Some((ctx, buffer))
    }

    /// Close the context and drop every buffer. Later calls are no-ops.
    pub fn dispose(&self) {
        let mut st = self.state.borrow_mut();
        st.disposed = true;
        st.rustle = None;
        st.impact = None;
        st.gate.reset();
        if let Some(ctx) = st.ctx.take() {
            if let Err(e) = ctx.close() {
                log::warn!("{}", FeedbackError::Output(format!("close: {:?}", e)));
            }
        }
    }
}

impl AudioFeedback for SoundManager {
    fn initialize(&self) {
        {
            let st = self.state.borrow();
            if st.disposed {
                return;
            }
        }
        let ctx = match self.context() {
            Ok(ctx) => ctx,
            Err(e) => {
                log::warn!("{}", e);
                return;
            }
        };
        let (rustle_url, indent_url) = {
            let mut st = self.state.borrow_mut();
            if !st.gate.try_begin() {
                return;
            }
            (st.rustle_url.clone(), st.indent_url.clone())
        };
        let state = self.state.clone();
        spawn_local(async move {
            let (rustle, impact) = futures::future::join(
                load_buffer(&ctx, &rustle_url),
                load_buffer(&ctx, &indent_url),
            )
            .await;
            let mut st = state.borrow_mut();
            if st.disposed {
                return;
            }
            match rustle {
                Ok(b) => st.rustle = Some(b),
                Err(e) => log::warn!("{}", e),
            }
            match impact {
                Ok(b) => st.impact = Some(b),
                Err(e) => log::warn!("{}", e),
            }
            st.gate.finish(true);
            log::info!(
                "audio ready (rustle: {}, impact: {})",
                st.rustle.is_some(),
                st.impact.is_some()
            );
        });
    }

    fn play_rustle(&self, intensity: f32) {
        // the throttle window is consumed even while the buffer is still loading
        let pb = {
            let mut st = self.state.borrow_mut();
            let now = st.clock.now_ms();
            st.policy.rustle(now, intensity)
        };
        let Some(pb) = pb else {
            return;
        };
        if let Some((ctx, buffer)) = self.ready(SampleKind::Rustle) {
            self.play(&ctx, &buffer, pb);
        }
    }

    fn play_indent(&self) {
        let Some((ctx, buffer)) = self.ready(SampleKind::Impact) else {
            return;
        };
        let pb = self.state.borrow_mut().policy.indent();
        self.play(&ctx, &buffer, pb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn initialize_after_dispose_starts_nothing() {
        let audio = SoundManager::new(7, "/sounds/rustle.mp3", "/sounds/indent.mp3");
        audio.dispose();
        audio.initialize();
        audio.play_rustle(1.0);
        audio.play_indent();
        let st = audio.state.borrow();
        assert!(st.disposed);
        assert!(st.ctx.is_none());
        assert_eq!(st.gate.loads_started(), 0);
    }

    #[wasm_bindgen_test]
    fn repeated_initialize_loads_once() {
        let audio = SoundManager::new(7, "/sounds/rustle.mp3", "/sounds/indent.mp3");
        audio.initialize();
        audio.initialize();
        assert!(audio.state.borrow().gate.loads_started() <= 1);
        audio.dispose();
        assert!(audio.state.borrow().ctx.is_none());
        assert!(audio.state.borrow().rustle.is_none());
    }
}
