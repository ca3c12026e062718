//! Audio acquisition via yt-dlp.
//!
//! Resolves a video URL to a single local mp3 file in the staging directory.
//! Playlist handling is deterministic: a URL naming both a video and a
//! playlist resolves to the video, a bare playlist URL resolves to its first
//! entry. Multi-item expansion never happens.

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::utils;
use crate::StageError;

/// The capability the pipeline needs from an audio provider: resolve a URL
/// to an audio file under `staging_dir` and return its path.
#[async_trait]
pub trait AudioSource: Send + Sync {
    async fn fetch(&self, url: &str, staging_dir: &Path) -> Result<PathBuf, StageError>;
}

/// Metadata from a pre-download probe.
#[derive(Debug, Clone, Default)]
pub struct VideoProbe {
    pub title: Option<String>,
    pub duration_secs: Option<f64>,
}

/// Build a staging filename that tolerates arbitrary titles and cannot
/// collide across concurrent runs.
pub fn staging_filename(title: Option<&str>) -> String {
    let uuid = uuid::Uuid::new_v4().to_string();
    let suffix = &uuid[..8];
    match title.map(utils::sanitize_filename).filter(|t| !t.is_empty()) {
        Some(title) => format!("{}_{}.mp3", title, suffix),
        None => format!("audio_{}.mp3", suffix),
    }
}

/// yt-dlp backed audio source.
pub struct YtDlpSource {
    yt_dlp_path: String,
}

impl YtDlpSource {
    pub fn new() -> Self {
        Self {
            yt_dlp_path: "yt-dlp".to_string(),
        }
    }

    /// Check if yt-dlp is available
    pub async fn check_availability(&self) -> bool {
        Command::new(&self.yt_dlp_path)
            .arg("--version")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Probe the URL for title and duration. Doubles as an early
    /// reachability check before anything is written to disk.
    async fn probe(&self, url: &str) -> Result<VideoProbe, StageError> {
        tracing::debug!(url = %url, "probing video metadata");

        let output = Command::new(&self.yt_dlp_path)
            .args(["--dump-json", "--no-playlist", "--playlist-items", "1", url])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| StageError::Download(format!("failed to invoke yt-dlp: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StageError::Download(format!(
                "yt-dlp could not resolve the URL: {}",
                stderr.trim()
            )));
        }

        let info: Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| StageError::Download(format!("unreadable yt-dlp metadata: {}", e)))?;

        Ok(VideoProbe {
            title: info["title"].as_str().map(|s| s.to_string()),
            duration_secs: info["duration"].as_f64(),
        })
    }

    /// Download and extract the audio track to `dest`.
    async fn download(&self, url: &str, dest: &Path) -> Result<(), StageError> {
        tracing::debug!(url = %url, dest = %dest.display(), "downloading audio");

        let output = Command::new(&self.yt_dlp_path)
            .args([
                "--output",
                &dest.to_string_lossy(),
                "--extract-audio",
                "--audio-format",
                "mp3",
                "--audio-quality",
                "192K",
                "--format",
                "bestaudio/best",
                "--no-playlist",
                "--playlist-items",
                "1",
                "--quiet",
                url,
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| StageError::Download(format!("failed to invoke yt-dlp: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StageError::Download(format!(
                "audio extraction failed: {}",
                stderr.trim()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl AudioSource for YtDlpSource {
    async fn fetch(&self, url: &str, staging_dir: &Path) -> Result<PathBuf, StageError> {
        let url = utils::validate_and_normalize_url(url)
            .map_err(|e| StageError::Download(e.to_string()))?;

        if !self.check_availability().await {
            return Err(StageError::Download(
                "yt-dlp is not available. Please install it: https://github.com/yt-dlp/yt-dlp"
                    .to_string(),
            ));
        }

        let probe = self.probe(&url).await?;
        if let Some(duration) = probe.duration_secs {
            tracing::info!(
                title = probe.title.as_deref().unwrap_or("<untitled>"),
                duration = %utils::format_duration(duration),
                "resolved audio stream"
            );
        }

        let dest = staging_dir.join(staging_filename(probe.title.as_deref()));
        self.download(&url, &dest).await?;

        if !dest.exists() {
            return Err(StageError::Download(
                "yt-dlp reported success but produced no audio file".to_string(),
            ));
        }

        tracing::info!(path = %dest.display(), "audio artifact ready");
        Ok(dest)
    }
}

impl Default for YtDlpSource {
    fn default() -> Self {
        Self::new()
    }
}
