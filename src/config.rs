//! Session configuration
//!
//! Loaded from an optional YAML file with kebab-case keys. Every field has a
//! default, so an empty file (or no file) gives a working configuration:
//!
//! ```yaml
//! poll-interval-ms: 200
//! initial-fen: rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1
//! log-level: info
//! skip-redundant-renders: true
//! ```

use crate::error::SyncError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Standard chess starting position
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// How often the playhead is polled while the video plays
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 200;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SyncConfig {
    pub poll_interval_ms: u64,
    /// Board shown before any move or position event is reached
    pub initial_fen: String,
    /// Default tracing filter, overridden by `BOARDSYNC_LOG`
    pub log_level: String,
    /// Skip renderer calls for parts of the board that did not change
    pub skip_redundant_renders: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            initial_fen: STARTING_FEN.to_string(),
            log_level: "info".to_string(),
            skip_redundant_renders: true,
        }
    }
}

impl SyncConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self, SyncError> {
        // An empty document deserializes as unit, not as a map
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: SyncConfig =
            serde_yaml::from_str(source).map_err(|e| SyncError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let source = std::fs::read_to_string(path).map_err(|e| SyncError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&source)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    fn validate(&self) -> Result<(), SyncError> {
        if self.poll_interval_ms == 0 {
            return Err(SyncError::ConfigError(
                "poll-interval-ms must be at least 1".to_string(),
            ));
        }
        if self.initial_fen.trim().is_empty() {
            return Err(SyncError::ConfigError("initial-fen must not be empty".to_string()));
        }
        Ok(())
    }
}
