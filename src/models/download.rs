//! Model download and installation management.
//!
//! Handles downloading ggml Whisper models from HuggingFace, verifying
//! their integrity, and storing them in the configured model directory.

use anyhow::{Context, Result};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use sha1::{Digest, Sha1};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::models::catalog::{get_model, resolve_name};
use crate::utils;

/// Get the full path for a model file inside `model_dir`.
///
/// Always returns a path regardless of whether the model is in the catalog.
/// The file may or may not exist on disk.
pub fn model_path(name: &str, model_dir: &Path) -> PathBuf {
    let resolved = resolve_name(name);
    model_dir.join(format!("ggml-{}.bin", resolved))
}

/// Check if a model is installed.
pub fn is_model_installed(name: &str, model_dir: &Path) -> bool {
    model_path(name, model_dir).exists()
}

/// Ensure the named model exists locally, downloading it if absent.
///
/// Idempotent: a model file already on disk short-circuits the download, so
/// repeated calls (and repeated pipeline runs) fetch at most once.
pub async fn ensure_model(name: &str, model_dir: &Path, progress: bool) -> Result<PathBuf> {
    let path = model_path(name, model_dir);

    if path.exists() {
        tracing::debug!(model = name, path = %path.display(), "model already installed");
        return Ok(path);
    }

    let info = get_model(name).with_context(|| {
        format!(
            "model '{}' not found in catalog; run 'tubescribe models list' to see available models",
            name
        )
    })?;

    download_to_path(info.name, info.url, info.sha1, info.size_mb, &path, progress).await?;
    Ok(path)
}

/// Core download: fetch url, save to path, verify sha1 if non-empty.
async fn download_to_path(
    name: &str,
    url: &str,
    sha1: &str,
    size_mb: u32,
    output_path: &Path,
    progress: bool,
) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs_err::create_dir_all(parent).context("Failed to create model directory")?;
    }

    tracing::info!(model = name, size_mb, "downloading model");

    let client = reqwest::Client::new();
    let response = client
        .get(url)
        .send()
        .await
        .context("Failed to start model download")?;

    if !response.status().is_success() {
        anyhow::bail!("Model download failed with status: {}", response.status());
    }

    let total_size = response.content_length().unwrap_or(0);

    let pb = if progress {
        let pb = ProgressBar::new(total_size);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                .expect("hardcoded progress bar template")
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    // Download with streaming and hash calculation
    let mut hasher = Sha1::new();
    let mut stream = response.bytes_stream();
    let mut file = fs_err::File::create(output_path).context("Failed to create model file")?;
    let mut downloaded = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("Failed to read download chunk")?;
        file.write_all(&chunk).context("Failed to write model file")?;
        hasher.update(&chunk);
        downloaded += chunk.len() as u64;
        if let Some(ref pb) = pb {
            pb.inc(chunk.len() as u64);
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Downloaded");
    }

    // Verify SHA-1 checksum
    if !sha1.is_empty() {
        let calculated_hash = format!("{:x}", hasher.finalize());
        if calculated_hash != sha1 {
            if let Err(e) = fs_err::remove_file(output_path) {
                tracing::warn!(error = %e, "failed to remove corrupted download");
            }
            anyhow::bail!(
                "SHA-1 checksum mismatch for model '{}'. Expected: {}, got: {}",
                name,
                sha1,
                calculated_hash
            );
        }
        tracing::debug!(model = name, "checksum verified");
    }

    tracing::info!(
        model = name,
        size = %utils::format_file_size(downloaded),
        path = %output_path.display(),
        "model installed"
    );

    Ok(())
}

/// List all installed model names by scanning the model directory.
///
/// Discovers every `ggml-*.bin` file, not just catalog models. Returns
/// model names with the `ggml-` prefix and `.bin` suffix stripped.
pub fn list_installed_models(model_dir: &Path) -> Vec<String> {
    let entries = match std::fs::read_dir(model_dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let name = entry.file_name();
            let name = name.to_str()?;
            let model = name.strip_prefix("ggml-")?.strip_suffix(".bin")?;
            if entry.path().is_file() {
                Some(model.to_string())
            } else {
                None
            }
        })
        .collect();

    names.sort();
    names
}
