//! Speech-to-text over a locally cached Whisper model.
//!
//! [`WhisperService`] owns the process-wide model handle. The handle is
//! loaded lazily on first use behind a load-once cell, so concurrent runs
//! trigger at most one download/instantiation and later runs reuse it.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::models;
use crate::utils;
use crate::StageError;

pub mod audio;
pub mod whisper;

pub use whisper::WhisperModel;

/// The capability the pipeline needs from a transcriber: resolve a local
/// audio file to plain text.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, StageError>;
}

/// Whisper-backed transcription service with a cached model handle.
pub struct WhisperService {
    model_name: String,
    model_dir: PathBuf,
    language: Option<String>,
    threads: Option<usize>,
    model: OnceCell<Arc<WhisperModel>>,
}

impl WhisperService {
    /// Create the service. Creates the model directory if absent; the model
    /// itself is not touched until the first transcription.
    pub fn new(
        model_name: String,
        model_dir: PathBuf,
        language: Option<String>,
        threads: Option<usize>,
    ) -> crate::Result<Self> {
        fs_err::create_dir_all(&model_dir)?;
        Ok(Self {
            model_name,
            model_dir,
            language,
            threads,
            model: OnceCell::new(),
        })
    }

    /// The cached model handle, loading it on first use.
    ///
    /// `OnceCell::get_or_try_init` serializes concurrent first use; a failed
    /// load leaves the cell empty so a later run can retry.
    async fn model(&self) -> Result<Arc<WhisperModel>, StageError> {
        self.model
            .get_or_try_init(|| async {
                let path = models::ensure_model(&self.model_name, &self.model_dir, true)
                    .await
                    .map_err(|e| StageError::Model(e.to_string()))?;

                tracing::info!(model = %self.model_name, "loading speech model");
                let language = self.language.clone();
                let threads = self.threads;
                let loaded =
                    tokio::task::spawn_blocking(move || WhisperModel::load(&path, language, threads))
                        .await
                        .map_err(|e| StageError::Model(format!("model load task failed: {}", e)))?;
                loaded.map(Arc::new)
            })
            .await
            .map(Arc::clone)
    }
}

#[async_trait]
impl SpeechToText for WhisperService {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, StageError> {
        utils::check_file_accessible(audio_path)
            .map_err(|e| StageError::Transcription(e.to_string()))?;

        let model = self.model().await?;
        let samples = audio::decode_samples(audio_path).await?;

        // Silence or an empty stream is valid input, not a failure.
        if samples.is_empty() {
            return Ok(String::new());
        }

        // Inference is CPU-bound and can run for minutes; keep it off the
        // async scheduler.
        let joined = tokio::task::spawn_blocking(move || model.transcribe(&samples))
            .await
            .map_err(|e| StageError::Transcription(format!("inference task failed: {}", e)))?;
        let text = joined?;

        tracing::info!(chars = text.len(), "transcription complete");
        Ok(text)
    }
}
