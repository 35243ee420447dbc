//! Human-readable board and result printers for the debug CLI, using
//! `crossterm::style::PrintStyledContent` rather than raw ANSI escapes.

use std::io::{stdout, Write};

use anyhow::Result;
use crossterm::execute;
use crossterm::style::{Attribute, Color, PrintStyledContent, Stylize};

use crate::outcome::Outcome;
use crate::solve::SolveResult;
use crate::tile::Board;

/// Cosmetic labels for attribute `a`: resolves the "attribute display
/// labels" open question in the same direction the reference took.
pub const PLANTS: [&str; 4] = ["MAPL", "CHRY", "PINE", "IRIS"];
/// Cosmetic labels for attribute `b`.
pub const POEMS: [&str; 4] = ["SUN ", "BIRD", "RAIN", "CLD "];

const RULE: &str = ".-----------------------------------------------------------------.";

/// Prints the 4x4 board plainly, one cell per column.
pub fn print_board(board: &Board) -> Result<()> {
    print_board_impl(board, None)
}

/// Prints the board with `highlight` (if any) bracketed and colored.
pub fn print_board_highlighted(board: &Board, highlight: usize) -> Result<()> {
    print_board_impl(board, Some(highlight))
}

fn print_board_impl(board: &Board, highlight: Option<usize>) -> Result<()> {
    let mut out = stdout();
    println!("{RULE}");
    for r in 0..4 {
        print!("| ");
        for c in 0..4 {
            let idx = r * 4 + c;
            let tile = board[idx];
            let label = format!("{:<2} {}:{}", idx, PLANTS[tile.a as usize], POEMS[tile.b as usize]);
            if Some(idx) == highlight {
                execute!(
                    out,
                    PrintStyledContent(
                        format!(">{label}<")
                            .with(Color::Black)
                            .on(Color::Yellow)
                            .attribute(Attribute::Bold)
                    )
                )?;
                print!(" | ");
            } else {
                print!(" {label}  | ");
            }
        }
        println!();
        println!("{RULE}");
    }
    out.flush()?;
    Ok(())
}

/// Prints the board-index reference grid, for orientation before reading
/// a solve result.
pub fn print_board_guide() {
    println!("  Board Index Reference:");
    println!("  +----+----+----+----+");
    for row in 0..4 {
        let cells: Vec<String> = (0..4).map(|c| format!("{:>3} ", row * 4 + c)).collect();
        println!("  |{}|", cells.join("|"));
        println!("  +----+----+----+----+");
    }
}

/// Prints the headline P1 result plus the P2 summary counts.
pub fn print_result(result: &SolveResult, elapsed_secs: f64) {
    println!("\n{} P1 RESULT {}", "=".repeat(18), "=".repeat(18));
    println!("  - P1 Win:      {}", result.is_p1_win);
    println!(
        "  - Best Move:   {} ({})",
        result.best_move, result.best_move_position
    );
    println!("  - Outcome:     {}", result.outcome);
    println!("  - Game Depth:  {} moves", result.game_depth);
    println!("  - Solve Time:  {elapsed_secs:.3}s");

    if result.has_p2_data() {
        let total = result.p1_wins_count + result.p2_wins_count + result.draws_count;
        println!("\n  P2 Analysis Summary:");
        println!(
            "    P1 wins {}/{total} openings | P2 wins {}/{total} | Draws {}/{total}",
            result.p1_wins_count, result.p2_wins_count, result.draws_count
        );
    }
    println!("{}", "=".repeat(47));
}

/// Prints the full P2 response table: P1's opening, P2's optimal reply,
/// the winner, and the resulting outcome.
pub fn print_p2_table(result: &SolveResult) {
    println!("\n{} P2 RESPONSES {}", "=".repeat(18), "=".repeat(18));
    println!("  {:<10} {:<13} {:<8} {}", "P1 Opens", "P2 Responds", "Winner", "Outcome");
    println!("  {}", "-".repeat(45));

    for resp in &result.p2_responses {
        let winner = if resp.outcome == Outcome::Draw {
            "Draw"
        } else if resp.is_p1_win {
            "P1"
        } else {
            "P2"
        };
        println!(
            "  Move {:<5} -> Move {:<7} {:<8} {}",
            resp.p1_move, resp.p2_best_move, winner, resp.outcome
        );
    }

    println!("  {}", "-".repeat(45));
    println!(
        "  P1 wins {} | P2 wins {} | Draws {}",
        result.p1_wins_count, result.p2_wins_count, result.draws_count
    );
    println!("{}", "=".repeat(50));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permutation_index::unrank;

    #[test]
    fn print_board_does_not_error_on_a_real_board() {
        let board = unrank(0).unwrap();
        assert!(print_board(&board).is_ok());
    }

    #[test]
    fn print_board_highlighted_does_not_error() {
        let board = unrank(1234).unwrap();
        assert!(print_board_highlighted(&board, 5).is_ok());
    }

    #[test]
    fn labels_cover_all_four_values_of_each_attribute() {
        assert_eq!(PLANTS.len(), 4);
        assert_eq!(POEMS.len(), 4);
    }
}
