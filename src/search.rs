use shakmaty::Move;
use tracing::debug;

use crate::evaluation::evaluate;
use crate::ordering::{order_moves, ScoredMove};
use crate::rules::RulesEngine;
use crate::types::{Score, SearchResult, SearchStats};

/// Fixed-depth minimax searcher. Owns the node and cutoff counters of the
/// search in progress; one instance must not be shared between concurrent searches.
#[derive(Debug, Clone)]
pub struct Searcher {
    stats: SearchStats,
    pruning: bool,
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Searcher {
    /// Minimax with alpha-beta pruning.
    pub fn new() -> Self {
        Self {
            stats: SearchStats::default(),
            pruning: true,
        }
    }

    /// Plain minimax over the same ordered tree: never cuts off. Returns the
    /// same score and move as [`Searcher::new`], only slower.
    pub fn exhaustive() -> Self {
        Self {
            stats: SearchStats::default(),
            pruning: false,
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn reset(&mut self) {
        self.stats = SearchStats::default();
    }

    /// Searches `depth` plies below `pos`. `maximizing` is true when the side to
    /// move wants the highest (white-relative) score.
    ///
    /// `best_move` is `None` only when `depth` is 0 or `pos` is already over.
    /// The position is back in its original state when this returns.
    pub fn search<R: RulesEngine>(&mut self, pos: &mut R, depth: u8, maximizing: bool) -> SearchResult {
        self.reset();

        let (score, best_move) = self.minimax(pos, depth, -Score::INFINITY, Score::INFINITY, maximizing);

        debug!(
            depth,
            score,
            nodes = self.stats.nodes,
            pruned = self.stats.pruned,
            "search complete"
        );

        SearchResult {
            best_move,
            score,
            depth,
            nodes: self.stats.nodes,
            pruned: self.stats.pruned,
        }
    }

    fn minimax<R: RulesEngine>(
        &mut self,
        pos: &mut R,
        depth: u8,
        mut alpha: Score,
        mut beta: Score,
        maximizing: bool,
    ) -> (Score, Option<Move>) {
        self.stats.nodes += 1;

        if depth == 0 || pos.is_game_over() {
            return (evaluate(pos), None);
        }

        let legal = pos.legal_moves();
        let moves = order_moves(pos, legal);

        let mut best_move: Option<Move> = None;
        let mut best_score = if maximizing {
            -Score::INFINITY
        } else {
            Score::INFINITY
        };

        for ScoredMove { mv, .. } in moves {
            pos.push(&mv);
            let (score, _) = self.minimax(pos, depth - 1, alpha, beta, !maximizing);
            pos.pop();

            // Strict comparison: on ties the earlier move in the ordering stays best
            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                beta = beta.min(score);
            }

            if self.pruning && beta <= alpha {
                self.stats.pruned += 1;
                break;
            }
        }

        (best_score, best_move)
    }
}
