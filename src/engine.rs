//! Difficulty-controlled entry point: picks a move for whichever side is to move.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use shakmaty::{Color, Move};
use tracing::info;

use crate::error::ParseDifficultyError;
use crate::rules::RulesEngine;
use crate::search::Searcher;
use crate::types::{SearchResult, SearchStats, DEFAULT_DEPTH, MAX_DEPTH, MIN_DEPTH};

/// Named strength levels. Each level searches as many plies as its number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner = 1,
    Easy = 2,
    Medium = 3,
    Hard = 4,
    Expert = 5,
    Master = 6,
}

impl Difficulty {
    pub const ALL: [Difficulty; 6] = [
        Difficulty::Beginner,
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
        Difficulty::Master,
    ];

    pub fn depth(self) -> u8 {
        self as u8
    }

    /// The level searching exactly `depth` plies, if any.
    pub fn from_depth(depth: u8) -> Option<Difficulty> {
        Difficulty::ALL.into_iter().find(|level| level.depth() == depth)
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
            Difficulty::Master => "master",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (depth {})", self.name(), self.depth())
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Difficulty::ALL
            .into_iter()
            .find(|level| level.name() == wanted || level.depth().to_string() == wanted)
            .ok_or_else(|| ParseDifficultyError(s.to_string()))
    }
}

fn clamp_depth(depth: u32) -> u8 {
    depth.clamp(u32::from(MIN_DEPTH), u32::from(MAX_DEPTH)) as u8
}

/// Holds the search depth for a game session and the statistics of its last search.
///
/// Each session owns its own `Engine`; statistics are not synchronized, so
/// concurrent searches need separate instances.
#[derive(Debug, Clone)]
pub struct Engine {
    depth: u8,
    searcher: Searcher,
    last: Option<SearchResult>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(u32::from(DEFAULT_DEPTH))
    }
}

impl Engine {
    pub fn new(depth: u32) -> Self {
        Self {
            depth: clamp_depth(depth),
            searcher: Searcher::new(),
            last: None,
        }
    }

    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        Self::new(u32::from(difficulty.depth()))
    }

    /// Sets the search depth, clamped into `MIN_DEPTH..=MAX_DEPTH`.
    pub fn set_depth(&mut self, depth: u32) {
        self.depth = clamp_depth(depth);
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.set_depth(u32::from(difficulty.depth()));
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Nodes and cutoffs of the most recent search.
    pub fn stats(&self) -> SearchStats {
        self.searcher.stats()
    }

    pub fn last_result(&self) -> Option<&SearchResult> {
        self.last.as_ref()
    }

    /// Best move for the side to move, or `None` if the game is already over.
    /// White maximizes, black minimizes.
    pub fn get_best_move<R: RulesEngine>(&mut self, pos: &mut R) -> Option<Move> {
        let maximizing = pos.turn() == Color::White;
        let result = self.searcher.search(pos, self.depth, maximizing);

        info!(
            depth = self.depth,
            score = result.score,
            nodes = result.nodes,
            pruned = result.pruned,
            "engine move chosen"
        );

        let best = result.best_move.clone();
        self.last = Some(result);
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::evaluate;
    use crate::game::Game;
    use crate::types::CHECKMATE_SCORE;

    #[test]
    fn test_depth_is_clamped() {
        let mut engine = Engine::default();
        assert_eq!(engine.depth(), 3);

        engine.set_depth(15);
        assert_eq!(engine.depth(), 10);
        engine.set_depth(0);
        assert_eq!(engine.depth(), 1);
        engine.set_depth(7);
        assert_eq!(engine.depth(), 7);

        assert_eq!(Engine::new(u32::MAX).depth(), 10);
    }

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!("Hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" master ".parse::<Difficulty>(), Ok(Difficulty::Master));
        assert_eq!("1".parse::<Difficulty>(), Ok(Difficulty::Beginner));
        assert!("7".parse::<Difficulty>().is_err());
        assert!("grandmaster".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_difficulty_from_depth() {
        assert_eq!(Difficulty::from_depth(4), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_depth(6), Some(Difficulty::Master));
        assert_eq!(Difficulty::from_depth(8), None);
        assert_eq!(Difficulty::from_depth(0), None);
    }

    #[test]
    fn test_set_difficulty_sets_depth() {
        let mut engine = Engine::default();
        engine.set_difficulty(Difficulty::Expert);
        assert_eq!(engine.depth(), 5);
        assert_eq!(Engine::with_difficulty(Difficulty::Beginner).depth(), 1);
    }

    #[test]
    fn test_opening_move_at_depth_one() {
        let mut board = Game::new();
        let mut engine = Engine::new(1);
        let best = engine.get_best_move(&mut board).unwrap();
        assert!(board.legal_moves().contains(&best));

        for mv in board.legal_moves() {
            board.push(&mv);
            assert!(evaluate(&board).is_finite());
            board.pop();
        }

        // Root plus its 20 children
        assert_eq!(engine.stats().nodes, 21);
        assert_eq!(engine.stats().pruned, 0);
    }

    #[test]
    fn test_black_finds_mate_and_reports_stats() {
        let mut board = Game::from_fen("rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq g3 0 2").unwrap();
        let mut engine = Engine::new(2);
        let best = engine.get_best_move(&mut board).unwrap();
        assert_eq!(board.san(&best), "Qh4#");

        let last = engine.last_result().unwrap();
        assert_eq!(last.score, -CHECKMATE_SCORE);
        assert_eq!(last.nodes, engine.stats().nodes);
        assert!(engine.stats().nodes > 1);
    }

    #[test]
    fn test_no_move_when_game_over() {
        let mut board = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let mut engine = Engine::new(4);
        assert!(engine.get_best_move(&mut board).is_none());
        assert_eq!(engine.stats().nodes, 1);
    }
}
