//! Configuration module for flowpipe
//!
//! A single TOML file describes how to run the reference greeting network:
//!
//! ```toml
//! [runner]
//! parallelism = 7
//! buffer_size = 16384
//!
//! [source]
//! count = 1000000
//! template = "Hi for the {n}:th time!"
//!
//! [sink]
//! kind = "file"
//! path = "out2.txt"
//!
//! [logging]
//! filter = "info"
//! ```
//!
//! Every field is optional; anything missing falls back to the defaults below.

use crate::error::{FlowError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default channel capacity, shared by every channel of a network
pub const DEFAULT_BUFFER_SIZE: usize = 16384;

/// Default number of items the greeting source generates
pub const DEFAULT_SOURCE_COUNT: usize = 1_000_000;

/// Default greeting template. `{n}` is replaced by the 1-based item index.
pub const DEFAULT_TEMPLATE: &str = "Hi for the {n}:th time!";

/// Default output file for the file sink
pub const DEFAULT_OUTPUT_PATH: &str = "out2.txt";

/// Default tracing filter directive
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Detected hardware parallelism minus one, never below one.
pub fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1).max(1))
        .unwrap_or(1)
}

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

fn default_source_count() -> usize {
    DEFAULT_SOURCE_COUNT
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

// ==================== Runner Config ====================

/// Settings handed to `PipelineRunner` at construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Number of stages expected to make progress at once. Advisory: every
    /// stage still gets its own thread.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,

    /// Capacity of every channel
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            parallelism: default_parallelism(),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl RunnerConfig {
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }
}

// ==================== Source Config ====================

/// Greeting source settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Number of greetings to generate
    #[serde(default = "default_source_count")]
    pub count: usize,

    /// Greeting template, `{n}` is the 1-based index
    #[serde(default = "default_template")]
    pub template: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_SOURCE_COUNT,
            template: default_template(),
        }
    }
}

// ==================== Sink Config ====================

/// Where the network's bytes end up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Concatenate everything into `path`
    #[default]
    File,
    /// Print each value on its own line
    Stdout,
}

impl std::fmt::Display for SinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkKind::File => write!(f, "file"),
            SinkKind::Stdout => write!(f, "stdout"),
        }
    }
}

/// Sink settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkConfig {
    #[serde(default)]
    pub kind: SinkKind,

    /// Output file, used when `kind` is `file`
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            kind: SinkKind::File,
            path: default_output_path(),
        }
    }
}

// ==================== Logging Config ====================

/// Logging settings for the binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Optional log file, written in addition to stderr
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            file: None,
        }
    }
}

// ==================== Pipeline Config ====================

/// Top-level configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PipelineConfig {
    #[serde(default)]
    pub runner: RunnerConfig,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub sink: SinkConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PipelineConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| FlowError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load a configuration file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            FlowError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        Self::from_toml(&content).map_err(|e| e.with_context(format!("{:?}", path)))
    }

    /// Load a configuration file, returning defaults if any error occurs
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save the configuration to disk as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                FlowError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| FlowError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            FlowError::Config(format!("Failed to write config file {:?}: {}", path, e))
        })
    }
}
