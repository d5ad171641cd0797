use shakmaty::Move;

pub type Score = f64;

/// Score of a position where black is checkmated. Negated when white is mated.
pub const CHECKMATE_SCORE: Score = 100_000.0;
pub const DRAW_SCORE: Score = 0.0;

pub const MIN_DEPTH: u8 = 1;
pub const MAX_DEPTH: u8 = 10;
pub const DEFAULT_DEPTH: u8 = 3;
pub const DEFAULT_MAX_PLIES: u32 = 300;

/// Counters accumulated over one top-level search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Minimax calls, leaves included.
    pub nodes: u64,
    /// Alpha-beta cutoffs taken.
    pub pruned: u64,
}

#[derive(Clone, Debug)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score: Score,
    pub depth: u8,
    pub nodes: u64,
    pub pruned: u64,
}
