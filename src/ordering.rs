use arrayvec::ArrayVec;
use shakmaty::{Move, MoveList, Square};

use crate::pst::{role_index, ORDER_VALUE};
use crate::rules::RulesEngine;

const CHECK_BONUS: i32 = 900;
const PROMOTION_BONUS: i32 = 800;
const CENTER_BONUS: i32 = 50;

pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

/// Central 4x4 block, c3 through f6.
fn is_center(sq: Square) -> bool {
    let file = sq.file() as u32;
    let rank = sq.rank() as u32;
    (2..=5).contains(&file) && (2..=5).contains(&rank)
}

/// Ordering priority of a single move. Plays and takes back the move once to
/// see whether it gives check.
pub fn move_priority<R: RulesEngine>(pos: &mut R, mv: &Move) -> i32 {
    let mut priority = 0;

    if pos.is_capture(mv) {
        // MVV-LVA on whatever stands on the target square; en passant has no victim there
        let victim = pos.piece_at(mv.to());
        let attacker = mv.from().and_then(|from| pos.piece_at(from));
        if let (Some(victim), Some(attacker)) = (victim, attacker) {
            priority += 10 * ORDER_VALUE[role_index(victim.role)] - ORDER_VALUE[role_index(attacker.role)];
        }
    }

    pos.push(mv);
    if pos.is_check() {
        priority += CHECK_BONUS;
    }
    pos.pop();

    if mv.is_promotion() {
        priority += PROMOTION_BONUS;
    }

    if is_center(mv.to()) {
        priority += CENTER_BONUS;
    }

    priority
}

/// Sorts `moves` by descending priority. Equal priorities keep the order the
/// rules engine produced them in, so the search's first-found tie-break is stable.
pub fn order_moves<R: RulesEngine>(pos: &mut R, moves: MoveList) -> ArrayVec<ScoredMove, 256> {
    let mut scored: ArrayVec<ScoredMove, 256> = ArrayVec::new();

    for mv in moves {
        let score = move_priority(pos, &mv);
        scored.push(ScoredMove { mv, score });
    }

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}
