//! `niya-debug`: solves a single board and prints a full diagnostic trace.

use std::time::Instant;

use anyhow::{bail, Result};
use clap::Parser;
use rand::Rng;

use niya_core::canonical::is_canonical;
use niya_core::diagnostics::{print_board, print_board_highlighted, print_p2_table, print_result};
use niya_core::permutation_index::{unrank, TOTAL_PERMUTATIONS};
use niya_core::solve::solve_with_stats;

/// Runs the Niya solver on a single board for debugging.
#[derive(Parser, Debug)]
#[command(name = "niya-debug", version, about)]
struct Cli {
    /// The specific permutation rank to solve. A random rank is used if
    /// omitted.
    rank: Option<u64>,

    /// Starting from `rank`, scan forward for the next canonical board
    /// and solve that one instead.
    #[arg(long)]
    find_canonical: bool,

    /// Print the transposition-table size alongside the result.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut rank = cli.rank.unwrap_or_else(|| rand::thread_rng().gen_range(0..TOTAL_PERMUTATIONS));
    println!("[*] Debugging with permutation rank: {rank}");

    let mut board = match unrank(rank) {
        Some(b) => b,
        None => bail!("rank {rank} is out of range (0..{TOTAL_PERMUTATIONS})"),
    };

    if cli.find_canonical {
        println!("[*] Searching for the next canonical board...");
        while !is_canonical(&board) {
            rank += 1;
            board = match unrank(rank) {
                Some(b) => b,
                None => bail!("ran off the end of the permutation space while searching"),
            };
        }
        println!("[*] Found canonical board at rank: {rank}");
    }

    println!("\n{} BOARD {}", "=".repeat(20), "=".repeat(20));
    print_board(&board)?;
    println!("{}", "=".repeat(47));

    println!("\n[*] Solving...");
    let start = Instant::now();
    let (result, tt_entries) = solve_with_stats(&board, false);
    let elapsed = start.elapsed().as_secs_f64();

    print_result(&result, elapsed);
    if cli.verbose {
        println!("  - TT Entries:  {tt_entries}");
    }

    if result.best_move >= 0 {
        println!("\n{} BEST MOVE HIGHLIGHTED {}", "=".repeat(17), "=".repeat(17));
        print_board_highlighted(&board, result.best_move as usize)?;
        println!("{}", "=".repeat(57));
    }

    print_p2_table(&result);

    Ok(())
}
