//! Whisper model catalog and local cache management.

pub mod catalog;
pub mod download;

pub use catalog::{default_model, get_model, list_models, resolve_name, ModelInfo};
pub use download::{ensure_model, is_model_installed, list_installed_models, model_path};
