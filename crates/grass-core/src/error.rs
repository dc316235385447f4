use thiserror::Error;

/// Failures in the audio feedback path.
///
/// None of these ever reach the host: callers log them at `warn!` and carry on
/// with silent playback.
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("no audio output context available")]
    NoAudioContext,
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("failed to decode {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("audio context resume rejected: {0}")]
    Resume(String),
    #[error("audio output error: {0}")]
    Output(String),
}
