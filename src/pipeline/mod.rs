//! The pipeline orchestrator.
//!
//! One [`Pipeline::run`] call performs a single-pass, fixed-order execution
//! of the three stages over one [`PipelineState`] record: acquire audio,
//! transcribe it, package the output. The first stage failure halts the run
//! and is surfaced with the stage that was in flight; there are no retries.

use std::path::PathBuf;
use std::sync::Arc;

use crate::acquire::{AudioSource, YtDlpSource};
use crate::config::Config;
use crate::payload;
use crate::transcribe::{SpeechToText, WhisperService};
use crate::StageError;

pub mod state;

pub use state::{PipelineState, Stage};

/// A stage failure together with the stage that produced it.
#[derive(thiserror::Error, Debug)]
#[error("pipeline failed while {stage}: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: StageError,
}

/// Runs the acquire -> transcribe -> package sequence for one URL at a time.
///
/// `run` takes `&self`, so a hosting layer may drive several runs
/// concurrently on one `Pipeline`; each run gets its own state record and a
/// collision-free staging filename. The speech model behind the
/// [`SpeechToText`] service is loaded once and shared by all runs.
pub struct Pipeline {
    staging_dir: PathBuf,
    source: Box<dyn AudioSource>,
    stt: Arc<dyn SpeechToText>,
}

impl Pipeline {
    /// Create a pipeline with the default yt-dlp and Whisper collaborators.
    ///
    /// Creates the staging directory if it does not exist yet.
    pub fn new(config: &Config) -> crate::Result<Self> {
        let staging_dir = config.download_dir();
        fs_err::create_dir_all(&staging_dir)?;

        let stt = WhisperService::new(
            config.model.name.clone(),
            config.model_dir(),
            config.model.language.clone(),
            config.model.threads,
        )?;

        Ok(Self {
            staging_dir,
            source: Box::new(YtDlpSource::new()),
            stt: Arc::new(stt),
        })
    }

    /// Create a pipeline with explicit collaborators.
    pub fn with_stages(
        staging_dir: PathBuf,
        source: Box<dyn AudioSource>,
        stt: Arc<dyn SpeechToText>,
    ) -> Self {
        Self {
            staging_dir,
            source,
            stt,
        }
    }

    /// Execute one run for `url`.
    ///
    /// On success the returned state carries both the transcript text and
    /// its base64 payload, and the audio artifact has been deleted.
    pub async fn run(&self, url: &str) -> Result<PipelineState, PipelineError> {
        let mut state = PipelineState::new(url);
        let mut stage = Stage::Start.next();

        while !stage.is_terminal() {
            tracing::info!(stage = %stage, url = %state.source_url(), "entering stage");

            let outcome = match stage {
                Stage::Acquiring => self.acquire(&mut state).await,
                Stage::Transcribing => self.transcribe(&mut state).await,
                Stage::Packaging => self.package(&mut state).await,
                Stage::Start | Stage::Done | Stage::Failed => unreachable!("not a running stage"),
            };

            if let Err(source) = outcome {
                tracing::error!(stage = %stage, error = %source, "stage failed");
                return Err(PipelineError { stage, source });
            }

            stage = stage.next();
        }

        Ok(state)
    }

    async fn acquire(&self, state: &mut PipelineState) -> Result<(), StageError> {
        let path = self
            .source
            .fetch(state.source_url(), &self.staging_dir)
            .await?;
        state.set_audio_path(path);
        Ok(())
    }

    async fn transcribe(&self, state: &mut PipelineState) -> Result<(), StageError> {
        let audio_path = state
            .audio_path()
            .map(|p| p.to_path_buf())
            .ok_or_else(|| StageError::Transcription("no audio artifact to transcribe".into()))?;
        let text = self.stt.transcribe(&audio_path).await?;
        state.set_transcript_text(text);
        Ok(())
    }

    async fn package(&self, state: &mut PipelineState) -> Result<(), StageError> {
        let encoded = {
            let text = state
                .transcript_text()
                .ok_or_else(|| StageError::Encoding("no transcript to package".into()))?;
            payload::encode(text)
        };

        // Cleanup is best effort and never fails the stage.
        if let Some(audio_path) = state.audio_path() {
            payload::cleanup_artifact(audio_path);
        }

        state.set_encoded_payload(encoded);
        Ok(())
    }
}
