//! shakmaty-backed game state implementing [`RulesEngine`].
//!
//! Keeps a stack of previous positions so moves can be taken back in order
//! and repetitions can be counted.

use std::fmt;
use std::iter;

use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::{
    attacks, Bitboard, Board, CastlingMode, Chess, Color, EnPassantMode, Move, MoveList, Piece,
    Position, Rank, Role, Square,
};

use crate::error::GameError;
use crate::rules::RulesEngine;

/// Half-moves without capture or pawn move after which a draw can be claimed.
const FIFTY_MOVE_PLIES: u32 = 100;
/// Half-moves after which the game ends without a claim.
const SEVENTY_FIVE_MOVE_PLIES: u32 = 150;

/// How a finished game ended, in the order the conditions are checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
    FiftyMoves,
    ThreefoldRepetition,
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Checkmate { winner: Color::White } => write!(f, "checkmate, white wins"),
            GameResult::Checkmate { winner: Color::Black } => write!(f, "checkmate, black wins"),
            GameResult::Stalemate => write!(f, "draw by stalemate"),
            GameResult::InsufficientMaterial => write!(f, "draw by insufficient material"),
            GameResult::FiftyMoves => write!(f, "draw by fifty-move rule"),
            GameResult::ThreefoldRepetition => write!(f, "draw by threefold repetition"),
        }
    }
}

/// The parts of a position that decide whether two positions repeat.
#[derive(Clone, Debug, PartialEq, Eq)]
struct RepetitionKey {
    board: Board,
    turn: Color,
    castling: Bitboard,
    ep_square: Option<Square>,
}

impl RepetitionKey {
    fn of(pos: &Chess) -> Self {
        Self {
            board: pos.board().clone(),
            turn: pos.turn(),
            castling: pos.castles().castling_rights(),
            ep_square: pos.ep_square(EnPassantMode::Legal),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Game {
    pos: Chess,
    undo: Vec<(Chess, Move)>,
}

impl Game {
    /// Standard starting position.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        let invalid = |reason: String| GameError::InvalidFen {
            fen: fen.to_string(),
            reason,
        };
        let parsed: Fen = fen.trim().parse().map_err(|e| invalid(format!("{e}")))?;
        let pos: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| invalid(format!("{e}")))?;

        Ok(Self {
            pos,
            undo: Vec::new(),
        })
    }

    pub fn position(&self) -> &Chess {
        &self.pos
    }

    pub fn fen(&self) -> String {
        Fen::from_position(self.pos.clone(), EnPassantMode::Legal).to_string()
    }

    /// Resolves a move given in long algebraic (`e2e4`, `e7e8q`) or standard
    /// algebraic (`e4`, `Nf3`, `Qh4#`) notation against the current position.
    pub fn parse_move(&self, input: &str) -> Result<Move, GameError> {
        let input = input.trim();

        if let Some(mv) = self.pos.legal_moves().into_iter().find(|m| self.uci(m) == input) {
            return Ok(mv);
        }

        if let Ok(san) = input.parse::<SanPlus>() {
            if let Ok(mv) = san.san.to_move(&self.pos) {
                return Ok(mv);
            }
        }

        Err(GameError::IllegalMove {
            input: input.to_string(),
            fen: self.fen(),
        })
    }

    /// Parses and plays a move, returning it.
    pub fn play(&mut self, input: &str) -> Result<Move, GameError> {
        let mv = self.parse_move(input)?;
        self.push(&mv);
        Ok(mv)
    }

    /// Standard algebraic notation of a legal move in the current position.
    pub fn san(&self, mv: &Move) -> String {
        SanPlus::from_move(self.pos.clone(), mv).to_string()
    }

    /// Long algebraic notation as used by UCI.
    pub fn uci(&self, mv: &Move) -> String {
        mv.to_uci(CastlingMode::Standard).to_string()
    }

    pub fn moves_played(&self) -> impl Iterator<Item = &Move> {
        self.undo.iter().map(|(_, mv)| mv)
    }

    pub fn ply_count(&self) -> usize {
        self.undo.len()
    }

    /// How many times the current position has occurred, itself included.
    pub fn repetitions(&self) -> usize {
        let current = RepetitionKey::of(&self.pos);
        self.undo
            .iter()
            .map(|(pos, _)| pos)
            .chain(iter::once(&self.pos))
            .filter(|pos| RepetitionKey::of(pos) == current)
            .count()
    }

    pub fn is_fifty_moves(&self) -> bool {
        self.pos.halfmoves() >= FIFTY_MOVE_PLIES
    }

    pub fn is_threefold_repetition(&self) -> bool {
        self.repetitions() >= 3
    }

    /// Describes how the game ended, or `None` while it can still go on.
    pub fn result(&self) -> Option<GameResult> {
        if self.pos.is_checkmate() {
            Some(GameResult::Checkmate {
                winner: !self.pos.turn(),
            })
        } else if self.pos.is_stalemate() {
            Some(GameResult::Stalemate)
        } else if self.pos.is_insufficient_material() {
            Some(GameResult::InsufficientMaterial)
        } else if self.is_fifty_moves() {
            Some(GameResult::FiftyMoves)
        } else if self.is_threefold_repetition() {
            Some(GameResult::ThreefoldRepetition)
        } else {
            None
        }
    }
}

impl RulesEngine for Game {
    fn turn(&self) -> Color {
        self.pos.turn()
    }

    fn legal_moves(&self) -> MoveList {
        self.pos.legal_moves()
    }

    fn push(&mut self, mv: &Move) {
        let previous = self.pos.clone();
        self.pos.play_unchecked(mv);
        self.undo.push((previous, mv.clone()));
    }

    fn pop(&mut self) -> Option<Move> {
        let (previous, mv) = self.undo.pop()?;
        self.pos = previous;
        Some(mv)
    }

    fn is_check(&self) -> bool {
        self.pos.is_check()
    }

    fn is_checkmate(&self) -> bool {
        self.pos.is_checkmate()
    }

    fn is_stalemate(&self) -> bool {
        self.pos.is_stalemate()
    }

    fn is_insufficient_material(&self) -> bool {
        self.pos.is_insufficient_material()
    }

    fn is_game_over(&self) -> bool {
        self.pos.is_checkmate()
            || self.pos.is_stalemate()
            || self.pos.is_insufficient_material()
            || self.pos.halfmoves() >= SEVENTY_FIVE_MOVE_PLIES
            || self.repetitions() >= 5
    }

    fn is_capture(&self, mv: &Move) -> bool {
        mv.is_capture()
    }

    fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.pos.board().piece_at(sq)
    }

    fn board(&self) -> &Board {
        self.pos.board()
    }

    fn count_legal_moves_for(&self, color: Color) -> usize {
        if color == self.pos.turn() {
            return self.pos.legal_moves().len();
        }
        // The swap is rejected while the side to move is in check. Fall back
        // to counting the opponent's pseudo-legal moves straight off the board.
        match self.pos.clone().swap_turn() {
            Ok(swapped) => swapped.legal_moves().len(),
            Err(_) => pseudo_legal_move_count(self.pos.board(), color),
        }
    }
}

/// Moves `color` could make ignoring checks, castling and en passant.
/// Promotions count once per promotion piece, as in legal move lists.
fn pseudo_legal_move_count(board: &Board, color: Color) -> usize {
    let occupied = board.occupied();
    let own = board.by_color(color);
    let theirs = board.by_color(!color);
    let (push, start_rank, last_rank) = match color {
        Color::White => (8, Rank::Second, Rank::Eighth),
        Color::Black => (-8, Rank::Seventh, Rank::First),
    };

    let mut count = 0;
    for sq in own {
        let Some(piece) = board.piece_at(sq) else {
            continue;
        };
        if piece.role != Role::Pawn {
            count += (attacks::attacks(sq, piece, occupied) & !own).count();
            continue;
        }

        let mut targets: Vec<Square> = (attacks::pawn_attacks(color, sq) & theirs).into_iter().collect();
        if let Some(single) = sq.offset(push).filter(|to| !occupied.contains(*to)) {
            targets.push(single);
            if sq.rank() == start_rank {
                if let Some(double) = single.offset(push).filter(|to| !occupied.contains(*to)) {
                    targets.push(double);
                }
            }
        }
        count += targets
            .iter()
            .map(|to| if to.rank() == last_rank { 4 } else { 1 })
            .sum::<usize>();
    }
    count
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  a b c d e f g h")?;
        for rank in (0..8u32).rev() {
            write!(f, "{}|", rank + 1)?;
            for file in 0..8u32 {
                let symbol = self
                    .pos
                    .board()
                    .piece_at(Square::new(rank * 8 + file))
                    .map_or('.', |piece| piece.char());
                write!(f, "{symbol} ")?;
            }
            writeln!(f, "|{}", rank + 1)?;
        }
        write!(f, "  a b c d e f g h")
    }
}
