use std::fmt;
use std::path::{Path, PathBuf};

/// The stages a pipeline run moves through.
///
/// Transitions are linear: `Start -> Acquiring -> Transcribing -> Packaging
/// -> Done`. `Failed` is terminal and reachable from any non-terminal stage via
/// the orchestrator's error path; it is never entered by [`Stage::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Start,
    /// Downloading and extracting the audio track.
    Acquiring,
    /// Running speech-to-text over the audio artifact.
    Transcribing,
    /// Encoding the transcript and releasing the audio artifact.
    Packaging,
    Done,
    Failed,
}

impl Stage {
    /// The stage label used in events and logging.
    pub fn label(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Acquiring => "acquiring audio",
            Self::Transcribing => "transcribing",
            Self::Packaging => "packaging output",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// The stage that follows on success. Terminal stages return themselves.
    pub fn next(self) -> Stage {
        match self {
            Self::Start => Self::Acquiring,
            Self::Acquiring => Self::Transcribing,
            Self::Transcribing => Self::Packaging,
            Self::Packaging => Self::Done,
            Self::Done => Self::Done,
            Self::Failed => Self::Failed,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The single mutable record threaded through all pipeline stages.
///
/// Each attribute is owned by one stage and write-once per run: the setters
/// keep the first value they are given. The record lives for exactly one
/// [`crate::Pipeline::run`] call.
#[derive(Debug, Clone)]
pub struct PipelineState {
    source_url: String,
    audio_path: Option<PathBuf>,
    transcript_text: Option<String>,
    encoded_payload: Option<String>,
}

impl PipelineState {
    pub(crate) fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            audio_path: None,
            transcript_text: None,
            encoded_payload: None,
        }
    }

    /// The URL the run was started with.
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Path of the downloaded audio artifact, once acquisition has run.
    ///
    /// The file itself is deleted by the packaging stage; after a completed
    /// run the path no longer refers to an existing file.
    pub fn audio_path(&self) -> Option<&Path> {
        self.audio_path.as_deref()
    }

    /// The transcript, once transcription has run.
    pub fn transcript_text(&self) -> Option<&str> {
        self.transcript_text.as_deref()
    }

    /// Base64 rendition of the transcript, once packaging has run.
    pub fn encoded_payload(&self) -> Option<&str> {
        self.encoded_payload.as_deref()
    }

    pub(crate) fn set_audio_path(&mut self, path: PathBuf) {
        debug_assert!(self.audio_path.is_none(), "audio_path is write-once");
        self.audio_path.get_or_insert(path);
    }

    pub(crate) fn set_transcript_text(&mut self, text: String) {
        debug_assert!(self.transcript_text.is_none(), "transcript_text is write-once");
        self.transcript_text.get_or_insert(text);
    }

    pub(crate) fn set_encoded_payload(&mut self, payload: String) {
        debug_assert!(self.encoded_payload.is_none(), "encoded_payload is write-once");
        self.encoded_payload.get_or_insert(payload);
    }
}
