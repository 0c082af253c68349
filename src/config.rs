//! Application configuration loaded from TOML.

use std::path::{Path, PathBuf};

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use spy_core::{STORAGE_KEY, WordBank};
use tracing::{debug, info, instrument};

/// Configuration for a play session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct PartyConfig {
    /// Directory holding the persisted session.
    #[serde(default = "default_data_dir")]
    data_dir: PathBuf,

    /// Key the session snapshot is stored under.
    #[serde(default = "default_storage_key")]
    storage_key: String,

    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    log_filter: String,

    /// Inline secret words, replacing the built-in bank.
    #[serde(default)]
    words: Option<Vec<String>>,

    /// Newline-separated word list, used when `words` is not set.
    #[serde(default)]
    word_file: Option<PathBuf>,

    /// Clear the terminal between cards so the next player cannot scroll back.
    #[serde(default = "default_clear_screen")]
    clear_screen: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".spy_party")
}

fn default_storage_key() -> String {
    STORAGE_KEY.to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_clear_screen() -> bool {
    true
}

impl Default for PartyConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: default_storage_key(),
            log_filter: default_log_filter(),
            words: None,
            word_file: None,
            clear_screen: default_clear_screen(),
        }
    }
}

impl PartyConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(data_dir = %config.data_dir.display(), "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Loads the file if it exists, otherwise returns the defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Overrides the data directory.
    pub fn with_data_dir(self, data_dir: PathBuf) -> Self {
        Self { data_dir, ..self }
    }

    /// Overrides screen clearing.
    pub fn with_clear_screen(self, clear_screen: bool) -> Self {
        Self {
            clear_screen,
            ..self
        }
    }

    /// Builds the word bank: inline words, then the word file, then the built-in list.
    #[instrument(skip(self))]
    pub fn word_bank(&self) -> Result<WordBank, ConfigError> {
        if let Some(words) = &self.words {
            return WordBank::new(words.clone())
                .map_err(|e| ConfigError::new(format!("Invalid inline words: {}", e)));
        }

        if let Some(path) = &self.word_file {
            let text = std::fs::read_to_string(path).map_err(|e| {
                ConfigError::new(format!("Failed to read word file '{}': {}", path.display(), e))
            })?;
            return WordBank::from_lines(&text).map_err(|e| {
                ConfigError::new(format!("Invalid word file '{}': {}", path.display(), e))
            });
        }

        Ok(WordBank::default())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
