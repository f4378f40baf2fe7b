//! Application settings storage
//!
//! Stores summarizer configuration in a JSON file in the config directory.
//! Every field has a default, so a partial or missing file is fine.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{Error, Result};

/// Global settings instance
static SETTINGS: RwLock<Option<Settings>> = RwLock::new(None);

/// Path to config file (set during init)
static CONFIG_PATH: RwLock<Option<PathBuf>> = RwLock::new(None);

/// Overrides `model_id` when set
pub const MODEL_ENV_VAR: &str = "PAPERSUM_MODEL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Hugging Face Hub model repository (T5 family)
    #[serde(default = "default_model_id")]
    pub model_id: String,
    #[serde(default = "default_revision")]
    pub revision: String,
    /// Local directory holding config.json, tokenizer.json and
    /// model.safetensors. Skips the Hub download when set.
    #[serde(default)]
    pub model_dir: Option<String>,
    /// Prepended to the document before tokenization
    #[serde(default = "default_task_prefix")]
    pub task_prefix: String,
    /// Documents longer than this are cut to their first N words
    #[serde(default = "default_max_input_words")]
    pub max_input_words: usize,
    /// Tokenizer truncation ceiling. T5 uses relative position buckets, so
    /// this only has to stay above what `max_input_words` produces.
    #[serde(default = "default_max_input_tokens")]
    pub max_input_tokens: usize,
    #[serde(default = "default_min_summary_tokens")]
    pub min_summary_tokens: usize,
    #[serde(default = "default_max_summary_tokens")]
    pub max_summary_tokens: usize,
    /// 1.0 disables the penalty (plain greedy decoding)
    #[serde(default = "default_repeat_penalty")]
    pub repeat_penalty: f32,
    /// Only honored when built with the `cuda` feature
    #[serde(default = "default_true")]
    pub use_gpu: bool,
    #[serde(default = "default_log_retention_days")]
    pub log_retention_days: i64,
}

fn default_model_id() -> String {
    "google-t5/t5-small".to_string()
}

fn default_revision() -> String {
    "main".to_string()
}

fn default_task_prefix() -> String {
    "summarize: ".to_string()
}

fn default_max_input_words() -> usize {
    1300 // ~1024 model tokens
}

fn default_max_input_tokens() -> usize {
    1024
}

fn default_min_summary_tokens() -> usize {
    50
}

fn default_max_summary_tokens() -> usize {
    300
}

fn default_repeat_penalty() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_log_retention_days() -> i64 {
    7
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_id: default_model_id(),
            revision: default_revision(),
            model_dir: None,
            task_prefix: default_task_prefix(),
            max_input_words: default_max_input_words(),
            max_input_tokens: default_max_input_tokens(),
            min_summary_tokens: default_min_summary_tokens(),
            max_summary_tokens: default_max_summary_tokens(),
            repeat_penalty: default_repeat_penalty(),
            use_gpu: true,
            log_retention_days: default_log_retention_days(),
        }
    }
}

impl Settings {
    /// Load settings from disk or create default
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
                Err(_) => Settings::default(),
            }
        } else {
            Settings::default()
        }
    }

    /// Save settings to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Settings(format!("Failed to serialize settings: {}", e)))?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Settings(format!("Failed to create config directory: {}", e)))?;
        }

        fs::write(path, content)
            .map_err(|e| Error::Settings(format!("Failed to write settings: {}", e)))?;

        Ok(())
    }

    /// Model repository, environment variable first
    pub fn effective_model_id(&self) -> String {
        if let Ok(model) = std::env::var(MODEL_ENV_VAR) {
            if !model.trim().is_empty() {
                return model.trim().to_string();
            }
        }
        self.model_id.clone()
    }
}

/// Default config directory (`<config_dir>/papersum`)
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|p| p.join("papersum"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Initialize settings with the config directory
pub fn init(config_dir: PathBuf) {
    init_with_path(config_dir.join("settings.json"));
}

/// Initialize settings from an explicit file
pub fn init_with_path(config_path: PathBuf) {
    let settings = Settings::load(&config_path);

    if let Ok(mut guard) = CONFIG_PATH.write() {
        *guard = Some(config_path);
    }
    if let Ok(mut guard) = SETTINGS.write() {
        *guard = Some(settings);
    }
}

/// Current settings (defaults before init)
pub fn get() -> Settings {
    SETTINGS
        .read()
        .ok()
        .and_then(|guard| guard.clone())
        .unwrap_or_default()
}

/// Path the settings were loaded from
pub fn config_path() -> Option<PathBuf> {
    CONFIG_PATH.read().ok()?.clone()
}

/// Write the current settings back to the config file
pub fn save() -> Result<PathBuf> {
    let config_path =
        config_path().ok_or_else(|| Error::Settings("Settings not initialized".to_string()))?;
    get().save(&config_path)?;
    Ok(config_path)
}
