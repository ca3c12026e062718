//! Tubescribe - turn a video URL into a transcript
//!
//! This library downloads the audio track of a video with yt-dlp, transcribes
//! it with a locally cached Whisper model, and packages the transcript as a
//! transport-safe base64 payload. The pieces are composed by a small
//! sequential pipeline; see [`pipeline::Pipeline`].

pub mod acquire;
pub mod cli;
pub mod config;
pub mod models;
pub mod output;
pub mod payload;
pub mod pipeline;
pub mod transcribe;
pub mod utils;

pub use acquire::{AudioSource, YtDlpSource};
pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use pipeline::{Pipeline, PipelineError, PipelineState, Stage};
pub use transcribe::{SpeechToText, WhisperService};

/// Result type used for plumbing outside the stage contract
pub type Result<T> = anyhow::Result<T>;

/// Failures a pipeline stage can surface.
///
/// Each variant belongs to exactly one stage: `Download` to audio
/// acquisition, `Model` and `Transcription` to transcription, `Encoding` to
/// output packaging. The orchestrator attaches the stage that was in flight
/// when wrapping one of these into a [`pipeline::PipelineError`].
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    #[error("audio download failed: {0}")]
    Download(String),

    #[error("speech model unavailable: {0}")]
    Model(String),

    #[error("transcription failed: {0}")]
    Transcription(String),

    #[error("payload encoding failed: {0}")]
    Encoding(String),
}
