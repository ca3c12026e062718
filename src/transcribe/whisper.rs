//! Thin wrapper around whisper-rs.

use std::path::Path;
use std::sync::{Mutex, Once};

use whisper_rs::{
    install_logging_hooks, FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters,
};

use crate::StageError;

static LOGGING_HOOKS_INSTALLED: Once = Once::new();

/// A loaded Whisper model.
///
/// The context is wrapped in a `Mutex`; each transcription creates its own
/// inference state from it.
pub struct WhisperModel {
    context: Mutex<WhisperContext>,
    language: Option<String>,
    threads: Option<usize>,
}

impl std::fmt::Debug for WhisperModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperModel")
            .field("language", &self.language)
            .field("threads", &self.threads)
            .field("context", &"<WhisperContext>")
            .finish()
    }
}

impl WhisperModel {
    /// Load a ggml model file.
    ///
    /// `language` pins the transcription language; `None` lets the model
    /// detect it. `threads` caps inference threads (`None` = auto).
    pub fn load(
        path: &Path,
        language: Option<String>,
        threads: Option<usize>,
    ) -> Result<Self, StageError> {
        // Route whisper.cpp's own stderr chatter through the log hooks (once).
        LOGGING_HOOKS_INSTALLED.call_once(|| {
            install_logging_hooks();
        });

        if !path.exists() {
            return Err(StageError::Model(format!(
                "model file not found at {}",
                path.display()
            )));
        }

        let path_str = path
            .to_str()
            .ok_or_else(|| StageError::Model("invalid UTF-8 in model path".to_string()))?;

        let context = WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
            .map_err(|e| StageError::Model(format!("failed to load Whisper model: {}", e)))?;

        Ok(Self {
            context: Mutex::new(context),
            language,
            threads,
        })
    }

    /// Transcribe 16 kHz mono f32 samples to plain text.
    ///
    /// Language detection and segmentation are the model's concern; the
    /// segments are concatenated and trimmed, nothing else.
    pub fn transcribe(&self, samples: &[f32]) -> Result<String, StageError> {
        let context = self
            .context
            .lock()
            .map_err(|e| StageError::Transcription(format!("failed to acquire context lock: {}", e)))?;

        let mut state = context
            .create_state()
            .map_err(|e| StageError::Transcription(format!("failed to create Whisper state: {}", e)))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(self.language.as_deref());
        if let Some(threads) = self.threads {
            params.set_n_threads(threads as i32);
        }

        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state
            .full(params, samples)
            .map_err(|e| StageError::Transcription(format!("Whisper inference failed: {}", e)))?;

        let mut transcription = String::new();
        for segment in state.as_iter() {
            transcription.push_str(&segment.to_string());
        }

        Ok(transcription.trim().to_string())
    }

    /// Convert i16 PCM samples to f32 normalized to [-1.0, 1.0].
    pub fn convert_samples(samples: &[i16]) -> Vec<f32> {
        samples
            .iter()
            .map(|&sample| sample as f32 / 32768.0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_samples_range() {
        let converted = WhisperModel::convert_samples(&[0, 16384, -16384, i16::MAX, i16::MIN]);
        assert_eq!(converted[0], 0.0);
        assert!((converted[1] - 0.5).abs() < 1e-4);
        assert!((converted[2] + 0.5).abs() < 1e-4);
        assert!(converted[3] < 1.0);
        assert_eq!(converted[4], -1.0);
    }

    #[test]
    fn test_convert_samples_empty() {
        assert!(WhisperModel::convert_samples(&[]).is_empty());
    }

    #[test]
    fn test_load_missing_model_file() {
        let err = WhisperModel::load(Path::new("/nonexistent/ggml-base.bin"), None, None)
            .err()
            .expect("load should fail");
        assert!(matches!(err, StageError::Model(_)));
    }
}
