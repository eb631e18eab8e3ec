//! circom-bridge configuration file handling
//!
//! Provides default configuration generation and loading for the CLI.
//! Configuration files are TOML. Every field has a default, so a missing
//! file or a partial file is fine; command-line flags override file values.

use circom_bridge::VerifierFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default log level
const DEFAULT_LOG_LEVEL: &str = "info";

/// Default result/error buffer capacity (1 MiB)
///
/// Solidity verifiers for mid-sized circuits run to tens of kilobytes, so
/// this leaves plenty of headroom. The engine never asks for more; an
/// undersized buffer fails with "buffer too small".
pub const DEFAULT_MAX_BUFFER: usize = 1 << 20;

/// CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Engine call settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Engine call settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Capacity of the result and error buffers, in bytes
    #[serde(default = "default_max_buffer")]
    pub max_buffer: usize,

    /// Verifying key encoding produced by `setup`
    #[serde(default)]
    pub verifier_format: VerifierFormat,

    /// Forward verbose logging to the engine
    #[serde(default)]
    pub verbose: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

fn default_max_buffer() -> usize {
    DEFAULT_MAX_BUFFER
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_buffer: DEFAULT_MAX_BUFFER,
            verifier_format: VerifierFormat::default(),
            verbose: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

impl BridgeConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: BridgeConfig = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        Ok(config)
    }

    /// Load the file if it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        fs::write(path, contents)
            .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))?;

        Ok(())
    }

    /// Generate default configuration content as a string with comments
    pub fn generate_default_toml() -> String {
        format!(
            r#"# circom-bridge configuration
#
# Command-line flags (--max-buffer, --verbose) override these values.

[engine]
# Capacity in bytes of the result and error buffers handed to the engine.
# The engine does not grow them: output that does not fit (terminator
# included) fails with "buffer too small". Raise this and retry.
max_buffer = {max_buffer}

# Verifying key encoding produced by `setup`: "json" or "solidity"
verifier_format = "json"

# Forward verbose logging to the engine (process-wide)
verbose = false

[logging]
# Log level: trace, debug, info, warn, error
level = "{level}"

# Log file path (optional, logs to stderr if not specified)
# file = "/var/log/circom-bridge.log"
"#,
            max_buffer = DEFAULT_MAX_BUFFER,
            level = DEFAULT_LOG_LEVEL
        )
    }

    /// Create and save a default configuration file
    pub fn create_default(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let contents = Self::generate_default_toml();

        // Create parent directory if needed
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        fs::write(config_path, contents).map_err(|e| {
            format!(
                "Failed to write config file '{}': {}",
                config_path.display(),
                e
            )
        })?;

        Ok(())
    }
}

/// Get the default config file path
///
/// - Linux: ~/.config/circom-bridge/config.toml
/// - macOS: ~/Library/Application Support/circom-bridge/config.toml
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("circom-bridge")
        .join("config.toml")
}
