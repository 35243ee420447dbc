//! The analytical query catalog for the `niya-analyze` CLI.

use anyhow::Result;

use crate::storage::Storage;

/// One entry in the query catalog: a title, a one-line description, and
/// the SQL text itself.
pub struct Query {
    pub title: &'static str,
    pub description: &'static str,
    pub sql: &'static str,
}

/// All 11 queries, in the reference's original order (also the order
/// `--list` prints them and an unqualified run executes them).
pub const QUERIES: [Query; 11] = [
    Query {
        title: "Game Balance",
        description: "Overall P1 win % vs P2 win % vs draw %",
        sql: "SELECT
            SUM(CASE WHEN p1_win = 1 THEN 1 ELSE 0 END) AS p1_wins,
            SUM(CASE WHEN is_draw = 1 THEN 1 ELSE 0 END) AS draws,
            SUM(CASE WHEN p1_win = 0 AND is_draw = 0 THEN 1 ELSE 0 END) AS p2_wins,
            COUNT(*) AS total,
            ROUND(100.0 * SUM(CASE WHEN p1_win = 1 THEN 1 ELSE 0 END) / COUNT(*), 2) AS p1_win_pct,
            ROUND(100.0 * SUM(CASE WHEN is_draw = 1 THEN 1 ELSE 0 END) / COUNT(*), 2) AS draw_pct,
            ROUND(100.0 * SUM(CASE WHEN p1_win = 0 AND is_draw = 0 THEN 1 ELSE 0 END) / COUNT(*), 2) AS p2_win_pct
        FROM solutions",
    },
    Query {
        title: "First-Mover Advantage",
        description: "How often P1 dominates all openings vs contested boards (P2 data only)",
        sql: "WITH categories(board_type, sort_order) AS (
            VALUES
                ('P1 dominates all openings', 1),
                ('P2 dominates all openings', 2),
                ('All draws', 3),
                ('Mixed (contested)', 4)
        ),
        classified AS (
            SELECT
                CASE
                    WHEN p2_wins_count = 0 AND draws_count = 0 THEN 'P1 dominates all openings'
                    WHEN p1_wins_count = 0 AND draws_count = 0 THEN 'P2 dominates all openings'
                    WHEN draws_count = p1_wins_count + p2_wins_count + draws_count THEN 'All draws'
                    ELSE 'Mixed (contested)'
                END AS board_type
            FROM solutions
            WHERE has_p2_data = 1
        )
        SELECT
            c.board_type,
            COUNT(cl.board_type) AS count,
            ROUND(100.0 * COUNT(cl.board_type) / MAX((SELECT COUNT(*) FROM classified), 1), 2) AS pct
        FROM categories c
        LEFT JOIN classified cl ON cl.board_type = c.board_type
        GROUP BY c.board_type, c.sort_order
        ORDER BY c.sort_order",
    },
    Query {
        title: "Strongest Opening Moves",
        description: "Which board positions are P1's best openings?",
        sql: "SELECT
            p1_best_move AS move,
            p1_best_move_pos AS position,
            COUNT(*) AS times_chosen,
            SUM(CASE WHEN p1_win = 1 THEN 1 ELSE 0 END) AS wins,
            ROUND(100.0 * SUM(CASE WHEN p1_win = 1 THEN 1 ELSE 0 END) / COUNT(*), 2) AS win_pct
        FROM solutions
        WHERE p1_best_move >= 0
        GROUP BY p1_best_move
        ORDER BY win_pct DESC",
    },
    Query {
        title: "Corner vs Edge Openings",
        description: "Does opening on a corner vs edge matter?",
        sql: "SELECT
            p1_best_move_pos AS position_type,
            COUNT(*) AS total,
            SUM(CASE WHEN p1_win = 1 THEN 1 ELSE 0 END) AS wins,
            ROUND(100.0 * SUM(CASE WHEN p1_win = 1 THEN 1 ELSE 0 END) / COUNT(*), 2) AS win_pct
        FROM solutions
        WHERE p1_best_move >= 0
        GROUP BY p1_best_move_pos",
    },
    Query {
        title: "Win Method Distribution",
        description: "How do games end? Row vs Column vs Diagonal vs Square vs Blockade",
        sql: "SELECT
            p1_outcome AS outcome,
            COUNT(*) AS frequency,
            ROUND(100.0 * COUNT(*) / (SELECT COUNT(*) FROM solutions), 2) AS pct
        FROM solutions
        GROUP BY p1_outcome
        ORDER BY frequency DESC",
    },
    Query {
        title: "Game Length Distribution",
        description: "How many moves until the game ends?",
        sql: "SELECT
            game_depth AS depth,
            COUNT(*) AS frequency,
            ROUND(100.0 * COUNT(*) / (SELECT COUNT(*) FROM solutions), 2) AS pct
        FROM solutions
        GROUP BY game_depth
        ORDER BY game_depth",
    },
    Query {
        title: "Game Length by Outcome",
        description: "Average game length per win method",
        sql: "SELECT
            p1_outcome AS outcome,
            ROUND(AVG(game_depth), 1) AS avg_depth,
            MIN(game_depth) AS shortest,
            MAX(game_depth) AS longest,
            COUNT(*) AS count
        FROM solutions
        GROUP BY p1_outcome
        ORDER BY avg_depth",
    },
    Query {
        title: "P2 Counter-Strategies",
        description: "Top P2 responses that flip P1-favored boards (P1 wins overall, but P2 wins specific openings)",
        sql: "SELECT
            r.p1_move,
            r.p2_best_move,
            r.outcome,
            COUNT(*) AS frequency
        FROM p2_responses r
        JOIN solutions s ON s.perm_index = r.perm_index
        WHERE s.p1_win = 1 AND r.is_p1_win = 0 AND r.outcome != 'Draw'
        GROUP BY r.p1_move, r.p2_best_move, r.outcome
        ORDER BY frequency DESC
        LIMIT 20",
    },
    Query {
        title: "Blockade Frequency (P2 Responses)",
        description: "How important is the blockade mechanic across all openings?",
        sql: "SELECT
            outcome,
            COUNT(*) AS frequency,
            ROUND(100.0 * COUNT(*) / (SELECT COUNT(*) FROM p2_responses), 2) AS pct
        FROM p2_responses
        GROUP BY outcome
        ORDER BY frequency DESC",
    },
    Query {
        title: "Decisive vs Contested Boards",
        description: "How many boards have a unanimous result vs mixed across openings? (P2 data only)",
        sql: "WITH categories(board_class, sort_order) AS (
            VALUES
                ('P1 wins all', 1),
                ('P2 wins all', 2),
                ('All draws', 3),
                ('Contested', 4)
        ),
        classified AS (
            SELECT
                CASE
                    WHEN p1_wins_count = p1_wins_count + p2_wins_count + draws_count THEN 'P1 wins all'
                    WHEN p2_wins_count = p1_wins_count + p2_wins_count + draws_count THEN 'P2 wins all'
                    WHEN draws_count = p1_wins_count + p2_wins_count + draws_count THEN 'All draws'
                    ELSE 'Contested'
                END AS board_class
            FROM solutions
            WHERE has_p2_data = 1
        )
        SELECT
            c.board_class,
            COUNT(cl.board_class) AS count,
            ROUND(100.0 * COUNT(cl.board_class) / MAX((SELECT COUNT(*) FROM classified), 1), 2) AS pct
        FROM categories c
        LEFT JOIN classified cl ON cl.board_class = c.board_class
        GROUP BY c.board_class, c.sort_order
        ORDER BY c.sort_order",
    },
    Query {
        title: "P2's Best Win Methods",
        description: "When P2 wins, how do they do it?",
        sql: "SELECT
            outcome,
            COUNT(*) AS frequency,
            ROUND(100.0 * COUNT(*) / SUM(COUNT(*)) OVER(), 2) AS pct
        FROM p2_responses
        WHERE is_p1_win = 0 AND outcome != 'Draw'
        GROUP BY outcome
        ORDER BY frequency DESC",
    },
];

/// Renders `headers`/`rows` as an aligned, whitespace-padded text table.
pub fn format_table(headers: &[String], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return "  (no data)\n".to_string();
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, val) in row.iter().enumerate() {
            widths[i] = widths[i].max(val.len());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(pad_row(headers, &widths));
    lines.push(format!(
        "  {}",
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  ")
    ));
    for row in rows {
        lines.push(pad_row(row, &widths));
    }
    lines.join("\n") + "\n"
}

fn pad_row(values: &[String], widths: &[usize]) -> String {
    let cells: Vec<String> = values
        .iter()
        .zip(widths)
        .map(|(v, w)| format!("{v:<w$}", w = *w))
        .collect();
    format!("  {}", cells.join("  "))
}

/// Runs one query by its 1-indexed position in [`QUERIES`] and prints a
/// titled, formatted table of results.
pub fn run_and_print(storage: &Storage, index_1based: usize) -> Result<()> {
    let query = &QUERIES[index_1based - 1];
    println!("\n{}", "=".repeat(60));
    println!("  Query {index_1based}: {}", query.title);
    println!("  {}", query.description);
    println!("{}", "=".repeat(60));

    match storage.run_query(query.sql) {
        Ok((headers, rows)) => print!("{}", format_table(&headers, &rows)),
        Err(err) => println!("  Error: {err}\n"),
    }
    Ok(())
}

/// Prints the title and description of every query, 1-indexed.
pub fn print_catalog() {
    println!("\nAvailable queries:\n");
    for (i, query) in QUERIES.iter().enumerate() {
        println!("  {:2}. {} - {}", i + 1, query.title, query.description);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_eleven_queries_with_nonempty_sql() {
        assert_eq!(QUERIES.len(), 11);
        for q in &QUERIES {
            assert!(!q.title.is_empty());
            assert!(!q.sql.trim().is_empty());
        }
    }

    #[test]
    fn format_table_handles_no_rows() {
        let headers = vec!["a".to_string(), "b".to_string()];
        assert_eq!(format_table(&headers, &[]), "  (no data)\n");
    }

    #[test]
    fn format_table_pads_columns_to_the_widest_cell() {
        let headers = vec!["name".to_string(), "count".to_string()];
        let rows = vec![vec!["alice".to_string(), "1".to_string()]];
        let table = format_table(&headers, &rows);
        assert!(table.contains("name "));
        assert!(table.contains("alice"));
    }

    #[test]
    fn every_query_runs_against_a_fresh_empty_database() {
        let storage = Storage::open_in_memory().unwrap();
        for i in 1..=QUERIES.len() {
            assert!(run_and_print(&storage, i).is_ok());
        }
    }
}
