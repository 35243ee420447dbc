//! The minimax core and solve orchestrator: a root search over openings
//! split from the recursive core, rather than threading a "root" flag
//! through one function.

use crate::outcome::{classify_position, MovePosition, Outcome};
use crate::tile::Board;
use crate::transposition::{Bound, TranspositionTable, TtEntry, TtKey};
use crate::win_patterns::check_win;
use crate::OPENING_CELLS;

/// Upper sentinel for a maximizing search window; no real score exceeds
/// `MAX_SCORE - 1`. An integer sentinel convention rather than
/// floating-point infinities.
const MAX_SCORE: i8 = 2;
/// Lower sentinel for a minimizing search window.
const MIN_SCORE: i8 = -2;

/// P1 wins the game.
const P1_WINS: i8 = 1;
/// P2 wins the game.
const P1_LOSES: i8 = -1;
/// Forced draw.
const DRAW_SCORE: i8 = 0;

/// P2's optimal response to one specific P1 opening move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct P2Response {
    pub p1_move: usize,
    pub p2_best_move: i8,
    pub is_p1_win: bool,
    pub outcome: Outcome,
}

/// The full result of solving a board.
#[derive(Clone, Debug)]
pub struct SolveResult {
    pub is_p1_win: bool,
    pub is_draw: bool,
    pub best_move: i8,
    pub outcome: Outcome,
    pub game_depth: u8,
    pub best_move_position: MovePosition,
    pub p1_wins_count: u32,
    pub p2_wins_count: u32,
    pub draws_count: u32,
    pub p2_responses: Vec<P2Response>,
}

impl SolveResult {
    /// Whether phase 2 (P2 reply enumeration) actually ran and produced
    /// data, i.e. `!skip_p2`.
    pub fn has_p2_data(&self) -> bool {
        !self.p2_responses.is_empty()
    }
}

/// Legal opening moves: the 12 non-interior cells, ascending.
pub fn opening_moves() -> &'static [usize; 12] {
    &OPENING_CELLS
}

/// Legal moves after `last` has just been played: every empty cell whose
/// tile is compatible with `board[last]`, ascending by cell index (required
/// for a deterministic `best_move`).
pub fn legal_moves(board: &Board, taken_mask: u16, last: usize) -> Vec<usize> {
    let last_tile = board[last];
    (0..16)
        .filter(|&i| taken_mask & (1 << i) == 0 && board[i].compatible_with(last_tile))
        .collect()
}

/// The recursive minimax core with alpha-beta pruning and a
/// bound-flagged transposition table. Returns `(score, outcome, depth)`
/// from P1's perspective.
#[allow(clippy::too_many_arguments)]
fn minimax(
    board: &Board,
    p1_mask: u16,
    p2_mask: u16,
    last: usize,
    p1_to_move: bool,
    mut alpha: i8,
    mut beta: i8,
    depth: u8,
    tt: &mut TranspositionTable,
) -> (i8, Outcome, u8) {
    let key: TtKey = (p1_mask, p2_mask, last as u8, p1_to_move);

    if let Some(entry) = tt.get(key) {
        match entry.bound {
            Bound::Exact => return (entry.score, entry.outcome, entry.depth),
            Bound::Lower => alpha = alpha.max(entry.score),
            Bound::Upper => beta = beta.min(entry.score),
        }
        if alpha >= beta {
            return (entry.score, entry.outcome, entry.depth);
        }
    }
    let search_alpha = alpha;
    let search_beta = beta;

    // 1. Did the previous move win?
    let previous_player_mask = if p1_to_move { p2_mask } else { p1_mask };
    if let Some(outcome) = check_win(previous_player_mask) {
        let score = if p1_to_move { P1_LOSES } else { P1_WINS };
        let result = (score, outcome, depth);
        tt.insert(key, exact_entry(result));
        return result;
    }

    // 2. Full board: draw.
    if depth == 16 {
        let result = (DRAW_SCORE, Outcome::Draw, 16);
        tt.insert(key, exact_entry(result));
        return result;
    }

    // 3. Legal moves; empty means the current player is blockaded.
    let taken = p1_mask | p2_mask;
    let moves = legal_moves(board, taken, last);
    if moves.is_empty() {
        let score = if p1_to_move { P1_LOSES } else { P1_WINS };
        let result = (score, Outcome::Blockade, depth);
        tt.insert(key, exact_entry(result));
        return result;
    }

    // 4. Recurse.
    let mut best_score;
    let mut best_outcome = Outcome::Draw;
    let mut best_depth = 16u8;

    if p1_to_move {
        best_score = MIN_SCORE;
        for mv in moves {
            let next_p1 = p1_mask | (1 << mv);
            let (score, outcome, end_depth) =
                minimax(board, next_p1, p2_mask, mv, false, alpha, beta, depth + 1, tt);
            if score > best_score {
                best_score = score;
                best_outcome = outcome;
                best_depth = end_depth;
            }
            alpha = alpha.max(score);
            if beta <= alpha {
                break;
            }
        }
    } else {
        best_score = MAX_SCORE;
        for mv in moves {
            let next_p2 = p2_mask | (1 << mv);
            let (score, outcome, end_depth) =
                minimax(board, p1_mask, next_p2, mv, true, alpha, beta, depth + 1, tt);
            if score < best_score {
                best_score = score;
                best_outcome = outcome;
                best_depth = end_depth;
            }
            beta = beta.min(score);
            if beta <= alpha {
                break;
            }
        }
    }

    let bound = if best_score <= search_alpha {
        Bound::Upper
    } else if best_score >= search_beta {
        Bound::Lower
    } else {
        Bound::Exact
    };
    tt.insert(
        key,
        TtEntry {
            score: best_score,
            outcome: best_outcome,
            depth: best_depth,
            bound,
        },
    );
    (best_score, best_outcome, best_depth)
}

fn exact_entry((score, outcome, depth): (i8, Outcome, u8)) -> TtEntry {
    TtEntry {
        score,
        outcome,
        depth,
        bound: Bound::Exact,
    }
}

/// Fully solves `board`: P1's optimal opening, and (unless `skip_p2`) P2's
/// optimal reply to every legal opening. `board` is assumed already
/// canonical -- canonicalization is the caller's responsibility (the
/// sampler canonicalizes before solving; `solve` itself is pure over
/// whatever board it is given).
pub fn solve(board: &Board, skip_p2: bool) -> SolveResult {
    solve_with_stats(board, skip_p2).0
}

/// Same contract as [`solve`], but also returns the number of distinct
/// transposition-table entries accumulated during the search -- a cheap
/// proxy for search effort, surfaced by the debug CLI's `--verbose` flag.
pub fn solve_with_stats(board: &Board, skip_p2: bool) -> (SolveResult, usize) {
    let mut tt = TranspositionTable::new();

    // --- Phase 1: P1 root search ---
    let mut alpha = MIN_SCORE;
    let beta = MAX_SCORE;
    let mut best_move: i8 = -1;
    let mut best_score = MIN_SCORE;
    let mut best_outcome = Outcome::Draw;
    let mut best_depth = 16u8;

    for &cell in opening_moves() {
        let p1_mask = 1u16 << cell;
        let (score, outcome, depth) = minimax(board, p1_mask, 0, cell, false, alpha, beta, 1, &mut tt);
        if score > best_score {
            best_score = score;
            best_move = cell as i8;
            best_outcome = outcome;
            best_depth = depth;
        }
        alpha = alpha.max(score);
        if beta <= alpha {
            break;
        }
    }

    let is_p1_win = best_score == P1_WINS;
    let is_draw = best_score == DRAW_SCORE;

    // --- Phase 2: P2 reply enumeration ---
    let mut p1_wins_count = 0u32;
    let mut p2_wins_count = 0u32;
    let mut draws_count = 0u32;
    let p2_responses = if skip_p2 {
        Vec::new()
    } else {
        let responses = analyze_p2_responses(board, &mut tt);
        for r in &responses {
            if r.outcome == Outcome::Draw {
                draws_count += 1;
            } else if r.is_p1_win {
                p1_wins_count += 1;
            } else {
                p2_wins_count += 1;
            }
        }
        responses
    };

    let tt_entries = tt.len();
    (
        SolveResult {
            is_p1_win,
            is_draw,
            best_move,
            outcome: best_outcome,
            game_depth: best_depth,
            best_move_position: classify_position(best_move.max(0) as usize),
            p1_wins_count,
            p2_wins_count,
            draws_count,
            p2_responses,
        },
        tt_entries,
    )
}

/// For every legal P1 opening, finds P2's optimal response. Reuses the
/// transposition table accumulated during phase 1.
fn analyze_p2_responses(board: &Board, tt: &mut TranspositionTable) -> Vec<P2Response> {
    let mut results = Vec::with_capacity(opening_moves().len());

    for &p1_move in opening_moves() {
        let p1_mask = 1u16 << p1_move;
        let p2_legal = legal_moves(board, p1_mask, p1_move);

        let mut alpha = MIN_SCORE;
        let mut beta = MAX_SCORE;
        let mut best_p2_move: i8 = -1;
        let mut best_p2_score = MAX_SCORE;
        let mut best_p2_outcome = Outcome::Draw;

        if p2_legal.is_empty() {
            // P2 is blockaded immediately after P1's opening.
            best_p2_score = P1_WINS;
            best_p2_outcome = Outcome::Blockade;
        } else {
            for p2_move in p2_legal {
                let p2_mask = 1u16 << p2_move;
                let (score, outcome, _depth) =
                    minimax(board, p1_mask, p2_mask, p2_move, true, alpha, beta, 2, tt);
                if score < best_p2_score {
                    best_p2_score = score;
                    best_p2_move = p2_move as i8;
                    best_p2_outcome = outcome;
                }
                beta = beta.min(score);
                if beta <= alpha {
                    break;
                }
            }
        }

        results.push(P2Response {
            p1_move,
            p2_best_move: best_p2_move,
            is_p1_win: best_p2_score == P1_WINS,
            outcome: best_p2_outcome,
        });
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::canonicalize;
    use crate::permutation_index::unrank;
    use crate::tile::Tile;

    fn board_from_attrs(a: [u8; 16], b: [u8; 16]) -> Board {
        std::array::from_fn(|i| Tile::new(a[i], b[i]))
    }

    #[test]
    fn solve_always_covers_all_twelve_openings_when_p2_runs() {
        let board = unrank(42).unwrap();
        let result = solve(&board, false);
        assert_eq!(result.p2_responses.len(), 12);
        assert_eq!(
            result.p1_wins_count + result.p2_wins_count + result.draws_count,
            12
        );
    }

    #[test]
    fn skip_p2_zeroes_the_reply_fields() {
        let board = unrank(42).unwrap();
        let result = solve(&board, true);
        assert!(result.p2_responses.is_empty());
        assert_eq!(result.p1_wins_count, 0);
        assert_eq!(result.p2_wins_count, 0);
        assert_eq!(result.draws_count, 0);
        assert!(!result.has_p2_data());
    }

    #[test]
    fn best_move_is_always_a_legal_opening_cell() {
        let board = unrank(9_999_999).unwrap();
        let result = solve(&board, true);
        assert!(result.best_move >= 0);
        assert!(opening_moves().contains(&(result.best_move as usize)));
    }

    #[test]
    fn phase1_and_phase2_agree_on_the_winner() {
        let board = unrank(123_456_789).unwrap();
        let result = solve(&board, false);
        let best = result.best_move as usize;
        let reply_for_best = result
            .p2_responses
            .iter()
            .find(|r| r.p1_move == best)
            .unwrap();
        assert_eq!(reply_for_best.is_p1_win, result.is_p1_win);
    }

    #[test]
    fn outcome_is_never_draw_before_depth_sixteen() {
        for r in [7u64, 101, 55_555, 20_000_000_001] {
            let board = unrank(r).unwrap();
            let result = solve(&board, true);
            if result.outcome == Outcome::Draw {
                assert_eq!(result.game_depth, 16);
            }
        }
    }

    #[test]
    fn every_draw_reply_is_counted_as_a_draw_not_a_p2_win() {
        let board = unrank(424_242).unwrap();
        let result = solve(&board, false);
        for r in &result.p2_responses {
            if r.outcome == Outcome::Draw {
                assert!(!r.is_p1_win);
            }
        }
    }

    /// A board with A constant per-row and B cycling 0..3 within each row
    /// is already its own canonical form.
    #[test]
    fn all_identical_row_attribute_board_is_already_canonical() {
        let a = [0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3];
        let b = [0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3];
        let board = board_from_attrs(a, b);
        assert_eq!(canonicalize(&board), board);

        let result = solve(&board, false);
        assert_eq!(
            result.p1_wins_count + result.p2_wins_count + result.draws_count,
            12
        );
    }

    /// End-to-end scenario 2: a checkerboard pattern of attribute B should
    /// reduce under the vertical-flip symmetry (it is not already
    /// canonical, since flipping columns produces a smaller sequence).
    #[test]
    fn checkerboard_b_pattern_is_not_its_own_canonical_form() {
        let a = [0; 16];
        let b = std::array::from_fn(|i| {
            let r = i / 4;
            let c = i % 4;
            ((r + c) % 2) as u8
        });
        let board = board_from_attrs(a, b);
        let canon = canonicalize(&board);
        assert_ne!(canon, board);
        assert!(canon < board);
    }
}
