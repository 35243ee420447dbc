//! `niya-analyze`: runs heuristic queries against the results database.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use niya_core::analysis::{print_catalog, run_and_print, QUERIES};
use niya_core::diagnostics::print_board_guide;
use niya_core::storage::Storage;

/// Runs heuristic queries against the Niya solver database.
#[derive(Parser, Debug)]
#[command(name = "niya-analyze", version, about)]
struct Cli {
    /// Run a specific query by number (1-indexed).
    #[arg(short, long)]
    query: Option<usize>,

    /// List all available queries and exit.
    #[arg(short, long)]
    list: bool,

    /// Path to the results database.
    #[arg(long, default_value = "data/niya.db")]
    db: String,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.list {
        print_catalog();
        return Ok(ExitCode::SUCCESS);
    }

    if !std::path::Path::new(&cli.db).exists() {
        eprintln!("[!] Database not found at {}", cli.db);
        eprintln!("    Run the solver first: niya-solve");
        return Ok(ExitCode::FAILURE);
    }

    let storage = match Storage::open(&cli.db) {
        Ok(s) => s,
        Err(err) => {
            eprintln!("[!] Could not open database at {}: {err}", cli.db);
            eprintln!("    Run the solver first: niya-solve");
            return Ok(ExitCode::FAILURE);
        }
    };

    let solved = storage.get_solved_count()?;
    if solved == 0 {
        eprintln!("[!] Database is empty. Run the solver first: niya-solve");
        return Ok(ExitCode::FAILURE);
    }
    println!("[*] Database: {}", cli.db);
    println!("[*] Boards solved: {solved}");

    if let Some(n) = cli.query {
        if n == 0 || n > QUERIES.len() {
            eprintln!("[!] Query number must be between 1 and {}", QUERIES.len());
            return Ok(ExitCode::FAILURE);
        }
        run_and_print(&storage, n)?;
    } else {
        print_board_guide();
        for i in 1..=QUERIES.len() {
            run_and_print(&storage, i)?;
        }
        println!("\n{}", "=".repeat(60));
        println!("  Done! All queries executed.");
        println!("{}", "=".repeat(60));
    }

    Ok(ExitCode::SUCCESS)
}
