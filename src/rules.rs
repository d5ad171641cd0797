//! The boundary between the search core and chess rules.
//!
//! Search, ordering and evaluation only ever talk to a position through this
//! trait. They never generate moves or judge legality themselves.

use shakmaty::{Board, Color, Move, MoveList, Piece, Square};

pub trait RulesEngine {
    fn turn(&self) -> Color;

    /// Legal moves for the side to move, in the rules engine's own order.
    fn legal_moves(&self) -> MoveList;

    /// Plays a legal move. Every `push` must be matched by a later `pop`.
    fn push(&mut self, mv: &Move);

    /// Undoes the most recent `push`, returning the move taken back.
    fn pop(&mut self) -> Option<Move>;

    fn is_check(&self) -> bool;
    fn is_checkmate(&self) -> bool;
    fn is_stalemate(&self) -> bool;
    fn is_insufficient_material(&self) -> bool;

    /// True when play cannot continue without a draw claim.
    fn is_game_over(&self) -> bool;

    fn is_capture(&self, mv: &Move) -> bool;

    fn piece_at(&self, sq: Square) -> Option<Piece>;

    fn board(&self) -> &Board;

    /// Number of legal moves `color` would have if it were on move, without
    /// changing whose turn it actually is. Implementations may fall back to a
    /// pseudo-legal count when the turn cannot be handed over, e.g. while the
    /// side to move is in check.
    fn count_legal_moves_for(&self, color: Color) -> usize;
}
