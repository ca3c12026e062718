//! Transcript renderings for the presentation layer.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

use crate::cli::OutputFormat;
use crate::pipeline::PipelineState;

pub mod document;

/// Stateless rendering formats for raw transcript text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFormat {
    PlainText,
    Document,
}

/// Render transcript text to bytes in the given format.
pub fn render(transcript_text: &str, format: RenderFormat) -> Result<Vec<u8>> {
    match format {
        RenderFormat::PlainText => Ok(transcript_text.as_bytes().to_vec()),
        RenderFormat::Document => document::render_document(transcript_text),
    }
}

/// JSON summary of a completed run.
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub source_url: &'a str,
    pub transcript_text: &'a str,
    pub payload_base64: &'a str,
    pub completed_at: DateTime<Utc>,
}

impl<'a> RunSummary<'a> {
    /// Build a summary from a completed run.
    ///
    /// A completed run carries both the transcript and its payload; a state
    /// missing either is a contract violation and is refused here rather
    /// than rendered as a partial result.
    pub fn from_state(state: &'a PipelineState) -> Result<Self> {
        Ok(Self {
            source_url: state.source_url(),
            transcript_text: state
                .transcript_text()
                .context("run completed without a transcript")?,
            payload_base64: state
                .encoded_payload()
                .context("run completed without an encoded payload")?,
            completed_at: Utc::now(),
        })
    }
}

/// Save a completed run to file in the requested format.
pub async fn save_to_file(state: &PipelineState, path: &Path, format: &OutputFormat) -> Result<()> {
    let summary = RunSummary::from_state(state)?;

    let content = match format {
        OutputFormat::Text => render(summary.transcript_text, RenderFormat::PlainText)?,
        OutputFormat::Json => serde_json::to_vec_pretty(&summary)?,
        OutputFormat::Document => render(summary.transcript_text, RenderFormat::Document)?,
    };

    fs_err::write(path, content)?;
    Ok(())
}

/// Print a completed run to the console in the requested format.
pub fn print_to_console(state: &PipelineState, format: &OutputFormat) -> Result<()> {
    let summary = RunSummary::from_state(state)?;

    match format {
        OutputFormat::Text => println!("{}", summary.transcript_text),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Document => {
            anyhow::bail!("document output is binary; pass --output FILE to save it")
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plain_text_is_identity() {
        let text = "hello 世界";
        let bytes = render(text, RenderFormat::PlainText).unwrap();
        assert_eq!(bytes, text.as_bytes());
    }

    #[test]
    fn test_render_document_produces_pdf_bytes() {
        let bytes = render("a short transcript", RenderFormat::Document).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
