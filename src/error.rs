//! Error types for the fallible edges of the engine: position setup, move
//! parsing and configuration loading. Search and evaluation never fail.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("invalid FEN {fen:?}: {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("illegal or unparsable move {input:?} in position {fen}")]
    IllegalMove { input: String, fen: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown difficulty {0:?}: expected 1-6 or beginner, easy, medium, hard, expert, master")]
pub struct ParseDifficultyError(pub String);
