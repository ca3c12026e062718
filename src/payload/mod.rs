//! Output packaging: transport-safe transcript encoding and artifact cleanup.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::path::Path;

use crate::StageError;

/// Encode transcript text as base64 over its UTF-8 bytes.
///
/// The result is ASCII-only and safe to embed in a JSON response body.
/// Never fails for valid UTF-8 input, which `&str` guarantees.
pub fn encode(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

/// Decode a payload produced by [`encode`] back to the original text.
pub fn decode(payload: &str) -> Result<String, StageError> {
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| StageError::Encoding(format!("invalid base64 payload: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| StageError::Encoding(format!("payload is not UTF-8 text: {}", e)))
}

/// Best-effort deletion of the temporary audio artifact.
///
/// Failures (already removed, permissions) are logged and swallowed: by the
/// time cleanup runs the caller already holds the payload it needs.
pub fn cleanup_artifact(path: &Path) {
    match fs_err::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "removed audio artifact"),
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "could not remove audio artifact"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_ascii() {
        let text = "the quick brown fox";
        assert_eq!(decode(&encode(text)).unwrap(), text);
    }

    #[test]
    fn test_round_trip_multibyte() {
        let text = "語音轉文字 — ユニコード ✓";
        let payload = encode(text);
        assert!(payload.is_ascii());
        assert_eq!(decode(&payload).unwrap(), text);
    }

    #[test]
    fn test_round_trip_empty() {
        assert_eq!(encode(""), "");
        assert_eq!(decode("").unwrap(), "");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode("!!! not base64 !!!").unwrap_err();
        assert!(matches!(err, StageError::Encoding(_)));
    }

    #[test]
    fn test_decode_rejects_non_utf8_bytes() {
        let payload = STANDARD.encode([0xff, 0xfe, 0xfd]);
        let err = decode(&payload).unwrap_err();
        assert!(matches!(err, StageError::Encoding(_)));
    }

    #[test]
    fn test_cleanup_missing_file_does_not_panic() {
        cleanup_artifact(Path::new("/nonexistent/audio_artifact.mp3"));
    }

    #[test]
    fn test_cleanup_removes_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("clip.mp3");
        std::fs::write(&file, b"data").expect("write");
        cleanup_artifact(&file);
        assert!(!file.exists());
    }
}
