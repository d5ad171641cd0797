//! Engine-vs-engine games.

use tracing::{debug, info, warn};

use crate::engine::Engine;
use crate::game::{Game, GameResult};
use crate::rules::RulesEngine;

#[derive(Debug, Clone)]
pub struct GameRecord {
    /// Moves in standard algebraic notation, white's first.
    pub moves: Vec<String>,
    /// `None` if the game was cut off by the ply limit or an engine gave up.
    pub result: Option<GameResult>,
    pub final_fen: String,
}

/// Plays `white` against `black` from the current state of `game` until the
/// game ends or `max_plies` half-moves have been played. Fifty-move and
/// threefold draws are claimed as soon as they arise.
pub fn play_game(white: &mut Engine, black: &mut Engine, game: &mut Game, max_plies: u32) -> GameRecord {
    let mut moves = Vec::new();

    for ply in 0..max_plies {
        if game.result().is_some() {
            break;
        }

        let engine = if game.turn().is_white() { &mut *white } else { &mut *black };
        let Some(mv) = engine.get_best_move(game) else {
            warn!(ply, fen = %game.fen(), "engine returned no move");
            break;
        };

        let san = game.san(&mv);
        debug!(ply, san = %san, nodes = engine.stats().nodes, "ply played");
        game.push(&mv);
        moves.push(san);
    }

    let result = game.result();
    match result {
        Some(result) => info!(plies = moves.len(), %result, "game over"),
        None => info!(plies = moves.len(), "game stopped before a result"),
    }

    GameRecord {
        moves,
        result,
        final_fen: game.fen(),
    }
}
