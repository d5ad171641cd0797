use shakmaty::{Board, Color, Square};

use crate::pst::{self, PIECE_VALUE};
use crate::rules::RulesEngine;
use crate::types::{Score, CHECKMATE_SCORE, DRAW_SCORE};

const POSITIONAL_WEIGHT: Score = 0.1;
const MOBILITY_WEIGHT: Score = 2.0;

/// Table index for a piece of `color` on `sq`. Black reads the mirrored square.
fn pst_index(sq: Square, color: Color) -> usize {
    match color {
        Color::White => sq as usize,
        Color::Black => sq as usize ^ 56,
    }
}

/// Endgame once the queens are gone, or when both queens remain but at most
/// two minor pieces are left between the two sides.
pub fn is_endgame(board: &Board) -> bool {
    let queens = board.queens().count();
    let minors = board.knights().count() + board.bishops().count();
    queens == 0 || (queens == 2 && minors <= 2)
}

/// White material minus black material, kings included.
pub fn material_score<R: RulesEngine>(pos: &R) -> i32 {
    let mut score = 0;
    for sq in pos.board().occupied() {
        if let Some(piece) = pos.piece_at(sq) {
            let value = PIECE_VALUE[pst::role_index(piece.role)];
            score += if piece.color == Color::White { value } else { -value };
        }
    }
    score
}

/// Sum of white piece-square values minus black's.
pub fn positional_score<R: RulesEngine>(pos: &R) -> i32 {
    let endgame = is_endgame(pos.board());
    let mut score = 0;
    for sq in pos.board().occupied() {
        if let Some(piece) = pos.piece_at(sq) {
            let table = pst::table(pst::role_index(piece.role), endgame);
            let value = table[pst_index(sq, piece.color)];
            score += if piece.color == Color::White { value } else { -value };
        }
    }
    score
}

/// White's legal move count minus black's, each counted as if that side were to move.
pub fn mobility_score<R: RulesEngine>(pos: &R) -> i32 {
    let white = pos.count_legal_moves_for(Color::White) as i32;
    let black = pos.count_legal_moves_for(Color::Black) as i32;
    white - black
}

/// Static evaluation from white's point of view.
///
/// Checkmate scores `-CHECKMATE_SCORE` when white is mated and `CHECKMATE_SCORE`
/// when black is; stalemate and insufficient material score as a draw.
pub fn evaluate<R: RulesEngine>(pos: &R) -> Score {
    if pos.is_checkmate() {
        return match pos.turn() {
            Color::White => -CHECKMATE_SCORE,
            Color::Black => CHECKMATE_SCORE,
        };
    }

    if pos.is_stalemate() || pos.is_insufficient_material() {
        return DRAW_SCORE;
    }

    let material = material_score(pos);
    let positional = positional_score(pos);
    let mobility = mobility_score(pos);

    material as Score + POSITIONAL_WEIGHT * positional as Score + MOBILITY_WEIGHT * mobility as Score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;

    fn game(fen: &str) -> Game {
        Game::from_fen(fen).unwrap()
    }

    #[test]
    fn test_startpos_is_balanced() {
        let board = Game::new();
        assert_eq!(material_score(&board), 0);
        assert_eq!(positional_score(&board), 0);
        assert_eq!(mobility_score(&board), 0);
        assert_eq!(evaluate(&board), 0.0);
    }

    #[test]
    fn test_white_up_queen() {
        let board = game("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(material_score(&board), 900);
        let score = evaluate(&board);
        assert!(score > 800.0, "White up a queen should score high, got {}", score);
    }

    #[test]
    fn test_black_up_queen_is_negative_regardless_of_turn() {
        let board = game("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR b KQkq - 0 1");
        let score = evaluate(&board);
        assert!(score < -800.0, "Black up a queen should be negative, got {}", score);
    }

    #[test]
    fn test_checkmate_sentinels() {
        // White to move and mated
        let white_mated = game("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert_eq!(evaluate(&white_mated), -CHECKMATE_SCORE);

        // Black to move and mated
        let black_mated = game("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4");
        assert_eq!(evaluate(&black_mated), CHECKMATE_SCORE);
    }

    #[test]
    fn test_draws_score_zero() {
        let stalemate = game("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert!(stalemate.is_stalemate());
        assert_eq!(evaluate(&stalemate), DRAW_SCORE);

        let bare_kings = game("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(evaluate(&bare_kings), DRAW_SCORE);
    }

    #[test]
    fn test_endgame_detection() {
        // No queens
        assert!(is_endgame(game("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").board()));
        // Both queens, two minors
        assert!(is_endgame(game("2b1k3/3q4/8/8/8/8/3Q4/2B1K3 w - - 0 1").board()));
        // Both queens, three minors
        assert!(!is_endgame(game("2b1k1n1/3q4/8/8/8/8/3Q4/2B1K3 w - - 0 1").board()));
        // A lone queen keeps the middlegame table
        assert!(!is_endgame(game("4k3/8/8/8/8/8/3Q4/4K3 w - - 0 1").board()));
        assert!(!is_endgame(Game::new().board()));
    }

    #[test]
    fn test_king_table_switches_in_endgame() {
        // Lone kings plus a pawn: centralised white king earns the endgame bonus
        let central = game("4k3/8/8/8/3K4/8/4P3/8 w - - 0 1");
        let corner = game("4k3/8/8/8/8/8/4P3/K7 w - - 0 1");
        assert!(positional_score(&central) > positional_score(&corner));
    }

    #[test]
    fn test_color_mirror_symmetry() {
        let pairs = [
            (
                "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1",
                "4k3/4p3/8/8/8/8/8/4K3 b - - 0 1",
            ),
            (
                "r3k3/1b6/8/3N4/8/8/PPP5/2KR4 w - - 0 1",
                "2kr4/ppp5/8/8/3n4/8/1B6/R3K3 b - - 0 1",
            ),
        ];
        for (fen, mirrored) in pairs {
            let a = game(fen);
            let b = game(mirrored);
            assert_eq!(material_score(&a), -material_score(&b), "material for {}", fen);
            assert_eq!(positional_score(&a), -positional_score(&b), "positional for {}", fen);
        }
    }

    #[test]
    fn test_giving_check_keeps_mobility() {
        // Same material, rook on e1 gives check, rook on d1 does not
        let check = game("4k3/8/8/8/8/8/PPP5/Q3R1K1 b - - 0 1");
        let quiet = game("4k3/8/8/8/8/8/PPP5/Q2R2K1 b - - 0 1");
        assert!(check.is_check());
        assert_eq!(mobility_score(&check), 25 - 4);
        assert_eq!(mobility_score(&quiet), 24 - 3);
    }

    #[test]
    fn test_score_combines_terms() {
        let board = game("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3");
        let expected = material_score(&board) as Score
            + 0.1 * positional_score(&board) as Score
            + 2.0 * mobility_score(&board) as Score;
        assert_eq!(evaluate(&board), expected);
    }

    #[test]
    fn test_evaluate_leaves_position_untouched() {
        let board = game("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 2 3");
        let before = board.fen();
        evaluate(&board);
        assert_eq!(board.fen(), before);
        assert_eq!(board.turn(), Color::Black);
    }
}
