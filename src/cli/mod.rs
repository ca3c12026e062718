use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tubescribe",
    about = "Tubescribe - turn video URLs into transcripts with a local Whisper model",
    version,
    long_about = "A CLI tool that downloads the audio track of a video with yt-dlp, transcribes it with a locally cached Whisper model, and renders the transcript as plain text, JSON, or a paginated PDF document."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transcribe the audio track of a video URL
    Transcribe {
        /// Video URL to transcribe
        #[arg(value_name = "URL")]
        url: String,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Language code for transcription (auto-detect if not specified)
        #[arg(short, long, value_name = "LANG")]
        language: Option<String>,

        /// Whisper model to use (overrides the configured model)
        #[arg(short, long, value_name = "MODEL")]
        model: Option<String>,
    },

    /// Show or initialize the configuration file
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },

    /// Manage locally installed Whisper models
    Models {
        #[command(subcommand)]
        command: ModelsCommand,
    },
}

#[derive(Subcommand)]
pub enum ModelsCommand {
    /// List catalog models and their install status
    List,

    /// Download a model into the local cache
    Install {
        /// Model name (e.g. "base", "small.en", "large")
        #[arg(value_name = "MODEL")]
        name: String,
    },
}

#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain transcript text
    Text,
    /// JSON run summary with the base64 payload
    Json,
    /// Paginated PDF document
    Document,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Document => write!(f, "document"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "document" => Ok(OutputFormat::Document),
            other => anyhow::bail!("unknown output format: {}", other),
        }
    }
}
