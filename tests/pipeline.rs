//! Orchestrator behavior with stub collaborators: stage ordering, fail-fast
//! attribution, artifact cleanup, and payload round-trips.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tubescribe::acquire::AudioSource;
use tubescribe::transcribe::SpeechToText;
use tubescribe::{payload, Pipeline, Stage, StageError};

struct StubSource {
    fail: bool,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl AudioSource for StubSource {
    async fn fetch(&self, _url: &str, staging_dir: &Path) -> Result<PathBuf, StageError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(StageError::Download("host unreachable".into()));
        }
        let path = staging_dir.join(format!("clip_{}.mp3", n));
        std::fs::write(&path, b"fake audio").expect("write stub artifact");
        Ok(path)
    }
}

struct StubStt {
    /// `None` makes transcription fail.
    text: Option<String>,
    /// Remove the artifact before returning, to exercise cleanup of an
    /// already-deleted file.
    delete_artifact: bool,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl SpeechToText for StubStt {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, StageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // The artifact must exist when transcription begins.
        assert!(audio_path.exists(), "transcription started without an artifact");
        let text = match &self.text {
            Some(text) => text.clone(),
            None => return Err(StageError::Transcription("undecodable audio".into())),
        };
        if self.delete_artifact {
            std::fs::remove_file(audio_path).expect("remove stub artifact");
        }
        Ok(text)
    }
}

fn pipeline_with(
    staging_dir: PathBuf,
    source_fail: bool,
    text: Option<&str>,
    delete_artifact: bool,
) -> (Pipeline, Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let source_calls = Arc::new(AtomicUsize::new(0));
    let stt_calls = Arc::new(AtomicUsize::new(0));
    let pipeline = Pipeline::with_stages(
        staging_dir,
        Box::new(StubSource {
            fail: source_fail,
            calls: Arc::clone(&source_calls),
        }),
        Arc::new(StubStt {
            text: text.map(str::to_string),
            delete_artifact,
            calls: Arc::clone(&stt_calls),
        }),
    );
    (pipeline, source_calls, stt_calls)
}

#[tokio::test]
async fn successful_run_populates_outputs_and_cleans_up() {
    let staging = tempfile::tempdir().expect("tempdir");
    let (pipeline, _, _) =
        pipeline_with(staging.path().to_path_buf(), false, Some("hello there"), false);

    let state = pipeline.run("https://example.com/v/1").await.expect("run");

    assert_eq!(state.source_url(), "https://example.com/v/1");
    assert_eq!(state.transcript_text(), Some("hello there"));

    let encoded = state.encoded_payload().expect("payload present");
    assert!(encoded.is_ascii());
    assert_eq!(payload::decode(encoded).expect("decode"), "hello there");

    // The artifact was recorded, then deleted by packaging.
    let audio_path = state.audio_path().expect("audio path recorded");
    assert!(!audio_path.exists());
}

#[tokio::test]
async fn acquisition_failure_stops_the_run() {
    let staging = tempfile::tempdir().expect("tempdir");
    let (pipeline, source_calls, stt_calls) =
        pipeline_with(staging.path().to_path_buf(), true, Some("never"), false);

    let err = pipeline.run("https://example.com/v/2").await.unwrap_err();

    assert_eq!(err.stage, Stage::Acquiring);
    assert!(matches!(err.source, StageError::Download(_)));
    assert_eq!(source_calls.load(Ordering::SeqCst), 1);
    assert_eq!(stt_calls.load(Ordering::SeqCst), 0, "later stage must not run");
}

#[tokio::test]
async fn transcription_failure_is_attributed_and_leaves_the_artifact() {
    let staging = tempfile::tempdir().expect("tempdir");
    let (pipeline, _, stt_calls) = pipeline_with(staging.path().to_path_buf(), false, None, false);

    let err = pipeline.run("https://example.com/v/3").await.unwrap_err();

    assert_eq!(err.stage, Stage::Transcribing);
    assert!(matches!(err.source, StageError::Transcription(_)));
    assert_eq!(stt_calls.load(Ordering::SeqCst), 1);

    // Cleanup only runs in packaging; a mid-pipeline failure may leave the
    // partial artifact behind.
    let leftovers: Vec<_> = std::fs::read_dir(staging.path())
        .expect("read staging dir")
        .collect();
    assert_eq!(leftovers.len(), 1);
}

#[tokio::test]
async fn empty_transcript_is_a_valid_result() {
    let staging = tempfile::tempdir().expect("tempdir");
    let (pipeline, _, _) = pipeline_with(staging.path().to_path_buf(), false, Some(""), false);

    let state = pipeline.run("https://example.com/silent").await.expect("run");

    assert_eq!(state.transcript_text(), Some(""));
    assert_eq!(state.encoded_payload(), Some(""));
    assert_eq!(payload::decode("").expect("decode"), "");
}

#[tokio::test]
async fn cleanup_tolerates_an_already_deleted_artifact() {
    let staging = tempfile::tempdir().expect("tempdir");
    let (pipeline, _, _) =
        pipeline_with(staging.path().to_path_buf(), false, Some("still fine"), true);

    let state = pipeline.run("https://example.com/v/4").await.expect("run");

    assert_eq!(state.transcript_text(), Some("still fine"));
    assert!(state.encoded_payload().is_some());
}

#[tokio::test]
async fn concurrent_runs_do_not_interfere() {
    let staging = tempfile::tempdir().expect("tempdir");
    let (pipeline, source_calls, _) =
        pipeline_with(staging.path().to_path_buf(), false, Some("two voices"), false);

    let (a, b) = tokio::join!(
        pipeline.run("https://example.com/v/a"),
        pipeline.run("https://example.com/v/b"),
    );

    let a = a.expect("run a");
    let b = b.expect("run b");

    assert_eq!(source_calls.load(Ordering::SeqCst), 2);
    assert_eq!(a.source_url(), "https://example.com/v/a");
    assert_eq!(b.source_url(), "https://example.com/v/b");
    assert_ne!(a.audio_path(), b.audio_path());
    assert_eq!(a.transcript_text(), b.transcript_text());
}
