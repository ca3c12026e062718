use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Speech model settings
    pub model: ModelConfig,

    /// Local storage locations
    pub storage: StorageConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier from the catalog (e.g. "base", "small.en")
    pub name: String,

    /// Transcription language code; None lets the model auto-detect
    pub language: Option<String>,

    /// Inference thread cap; None auto-detects
    pub threads: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Staging area for downloaded audio; defaults under the user cache dir
    pub download_dir: Option<PathBuf>,

    /// Model cache directory; defaults under the user cache dir
    pub model_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default output format when none is given on the command line
    pub default_output_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig {
                name: models::default_model().name.to_string(),
                language: None,
                threads: None,
            },
            storage: StorageConfig {
                download_dir: None,
                model_dir: None,
            },
            app: AppConfig {
                default_output_format: "text".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content =
                fs_err::read_to_string(&config_path).context("Failed to read config file")?;

            let config: Config =
                serde_yaml::from_str(&content).context("Failed to parse config file")?;

            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save().await?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        fs_err::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("tubescribe").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.name.is_empty() {
            anyhow::bail!("Model name must not be empty");
        }

        // A name outside the catalog is fine if the file is already local.
        if models::get_model(&self.model.name).is_none()
            && !models::is_model_installed(&self.model.name, &self.model_dir())
        {
            anyhow::bail!(
                "Unknown model '{}'; run 'tubescribe models list' to see available models",
                self.model.name
            );
        }

        if !matches!(
            self.app.default_output_format.as_str(),
            "text" | "json" | "document"
        ) {
            anyhow::bail!(
                "Unknown output format '{}' (expected text, json, or document)",
                self.app.default_output_format
            );
        }

        Ok(())
    }

    /// Staging directory for downloaded audio
    pub fn download_dir(&self) -> PathBuf {
        self.storage
            .download_dir
            .clone()
            .unwrap_or_else(|| Self::cache_root().join("downloads"))
    }

    /// Model cache directory
    pub fn model_dir(&self) -> PathBuf {
        self.storage
            .model_dir
            .clone()
            .unwrap_or_else(|| Self::cache_root().join("models"))
    }

    fn cache_root() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("tubescribe")
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Model: {}", self.model.name);
        println!(
            "  Language: {}",
            self.model.language.as_deref().unwrap_or("auto-detect")
        );
        println!("  Download Dir: {}", self.download_dir().display());
        println!("  Model Dir: {}", self.model_dir().display());
        println!("  Default Format: {}", self.app.default_output_format);
    }
}
