use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::engine::{Difficulty, Engine};
use crate::error::ConfigError;
use crate::types::{DEFAULT_DEPTH, DEFAULT_MAX_PLIES};

/// Session settings, usually read from a TOML file:
///
/// ```toml
/// depth = 4              # or: difficulty = "hard"
/// max_plies = 200
/// log_filter = "prune=debug"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Search depth; clamped by the engine, never rejected.
    pub depth: u32,
    /// Named level, overrides `depth` when present.
    pub difficulty: Option<Difficulty>,
    /// Self-play games stop after this many half-moves.
    pub max_plies: u32,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depth: u32::from(DEFAULT_DEPTH),
            difficulty: None,
            max_plies: DEFAULT_MAX_PLIES,
            log_filter: None,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn effective_depth(&self) -> u32 {
        self.difficulty
            .map_or(self.depth, |level| u32::from(level.depth()))
    }

    pub fn engine(&self) -> Engine {
        Engine::new(self.effective_depth())
    }
}
