//! Fixed-depth minimax chess engine with alpha-beta pruning.
//!
//! Chess rules come from `shakmaty` behind the [`rules::RulesEngine`] trait;
//! this crate only orders moves, evaluates positions and searches.

pub mod config;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod game;
pub mod ordering;
pub mod pst;
pub mod rules;
pub mod search;
pub mod selfplay;
pub mod types;
pub mod uci;

pub use config::EngineConfig;
pub use engine::{Difficulty, Engine};
pub use game::{Game, GameResult};
pub use rules::RulesEngine;
pub use search::Searcher;
pub use types::{Score, SearchResult, SearchStats, CHECKMATE_SCORE};
