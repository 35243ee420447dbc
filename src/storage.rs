//! SQLite-backed persistence for solver results.
//!
//! Two tables: `solutions` keyed by permutation rank and `p2_responses`
//! keyed by `(perm_index, p1_move)`, with `INSERT OR IGNORE` batches so a
//! resumed sampler run never double counts a rank it already solved.
//!
//! Per `spec.md`'s "one connection-per-call" / "connections are short-lived"
//! requirement, a file-backed [`Storage`] holds only its path: every method
//! opens its own `Connection`, ensures the schema, does its work, and drops
//! the connection on return (mirroring `original_source/src/database.py`'s
//! per-call `sqlite3.connect()`/`conn.close()`). The in-memory variant used
//! by tests is the one exception -- a `:memory:` database's contents do not
//! survive reconnecting, so it holds a single connection for its lifetime.

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::outcome::Outcome;
use crate::solve::SolveResult;

enum Backend {
    Path(String),
    Memory(Connection),
}

/// A handle to the results database. Cheap to clone-by-reopening for the
/// file-backed variant; see the module docs for why the in-memory variant
/// differs.
pub struct Storage {
    backend: Backend,
}

impl Storage {
    /// Points at the database file at `path`, creating its parent directory
    /// if needed (the default path, `data/niya.db`, does not exist on a
    /// fresh clone). No connection is held open past this call; the schema
    /// is created (if missing) on the first real operation.
    pub fn open(path: &str) -> Result<Self> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory {}", parent.display()))?;
            }
        }
        let storage = Self {
            backend: Backend::Path(path.to_string()),
        };
        // Touch the database once up front so a missing/malformed file is
        // reported immediately rather than on the first batch.
        storage.with_connection(|_| Ok(()))?;
        Ok(storage)
    }

    /// An in-memory database, used by tests and anything that shouldn't
    /// touch disk.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        init_schema(&conn)?;
        Ok(Self {
            backend: Backend::Memory(conn),
        })
    }

    /// Opens a fresh connection for the file-backed variant (ensuring the
    /// schema exists on it), or reuses the held connection for the
    /// in-memory variant, runs `f`, then drops the fresh connection.
    fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        match &self.backend {
            Backend::Path(path) => {
                let conn = Connection::open(path)
                    .with_context(|| format!("failed to open database at {path}"))?;
                init_schema(&conn)?;
                f(&conn)
            }
            Backend::Memory(conn) => f(conn),
        }
    }

    /// Same as [`Storage::with_connection`] but for operations that need a
    /// mutable connection (a transaction).
    fn with_connection_mut<T>(&mut self, f: impl FnOnce(&mut Connection) -> Result<T>) -> Result<T> {
        match &mut self.backend {
            Backend::Path(path) => {
                let mut conn = Connection::open(path.as_str())
                    .with_context(|| format!("failed to open database at {path}"))?;
                init_schema(&conn)?;
                f(&mut conn)
            }
            Backend::Memory(conn) => f(conn),
        }
    }

    /// The number of canonical boards already solved and saved.
    pub fn get_solved_count(&self) -> Result<u64> {
        self.with_connection(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM solutions", [], |row| row.get(0))
                .context("failed to count solved boards")?;
            Ok(count as u64)
        })
    }

    /// Saves a batch of `(perm_index, result)` pairs inside one
    /// transaction, opened and committed on a single short-lived
    /// connection. Duplicate ranks (from a resumed or racing run) are
    /// silently ignored rather than treated as an error.
    pub fn save_batch(&mut self, batch: &[(u64, SolveResult)]) -> Result<()> {
        self.with_connection_mut(|conn| {
            let tx = conn.transaction().context("failed to start transaction")?;
            {
                let mut insert_solution = tx.prepare(
                    "INSERT OR IGNORE INTO solutions VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                )?;
                let mut insert_response = tx.prepare(
                    "INSERT OR IGNORE INTO p2_responses VALUES (?1, ?2, ?3, ?4, ?5)",
                )?;

                for (perm_index, result) in batch {
                    let has_p2_data = result.has_p2_data();
                    insert_solution.execute(params![
                        *perm_index as i64,
                        result.is_p1_win,
                        result.is_draw,
                        result.best_move,
                        result.outcome.as_str(),
                        result.best_move_position.as_str(),
                        result.game_depth,
                        result.p1_wins_count,
                        result.p2_wins_count,
                        result.draws_count,
                        has_p2_data,
                    ])?;

                    if has_p2_data {
                        for resp in &result.p2_responses {
                            insert_response.execute(params![
                                *perm_index as i64,
                                resp.p1_move,
                                resp.p2_best_move,
                                resp.is_p1_win,
                                resp.outcome.as_str(),
                            ])?;
                        }
                    }
                }
            }
            tx.commit().context("failed to commit batch")?;
            Ok(())
        })
    }

    /// Runs an ad-hoc analytical query and returns `(column names, rows)`
    /// with every cell rendered as a display string, for the analysis CLI.
    pub fn run_query(&self, sql: &str) -> Result<(Vec<String>, Vec<Vec<String>>)> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(sql).context("failed to prepare query")?;
            let column_count = stmt.column_count();
            let headers: Vec<String> = stmt
                .column_names()
                .into_iter()
                .map(|s| s.to_string())
                .collect();

            let mut rows = Vec::new();
            let mut query_rows = stmt.query([])?;
            while let Some(row) = query_rows.next()? {
                let mut rendered = Vec::with_capacity(column_count);
                for i in 0..column_count {
                    let value: rusqlite::types::Value = row.get(i)?;
                    rendered.push(render_value(&value));
                }
                rows.push(rendered);
            }
            Ok((headers, rows))
        })
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS solutions (
            perm_index INTEGER PRIMARY KEY,
            p1_win INTEGER,
            is_draw INTEGER,
            p1_best_move INTEGER,
            p1_outcome TEXT,
            p1_best_move_pos TEXT,
            game_depth INTEGER,
            p1_wins_count INTEGER,
            p2_wins_count INTEGER,
            draws_count INTEGER,
            has_p2_data INTEGER DEFAULT 0
        );
        CREATE TABLE IF NOT EXISTS p2_responses (
            perm_index INTEGER,
            p1_move INTEGER,
            p2_best_move INTEGER,
            is_p1_win INTEGER,
            outcome TEXT,
            PRIMARY KEY (perm_index, p1_move),
            FOREIGN KEY (perm_index) REFERENCES solutions(perm_index)
        );",
    )?;
    Ok(())
}

fn render_value(value: &rusqlite::types::Value) -> String {
    use rusqlite::types::Value;
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(s) => s.clone(),
        Value::Blob(_) => "<blob>".to_string(),
    }
}

/// Turns a stored `p1_outcome`/`outcome` text column back into an
/// [`Outcome`], for consumers that want the typed value rather than the
/// display string.
pub fn outcome_from_str(s: &str) -> Option<Outcome> {
    Outcome::ALL.iter().copied().find(|o| o.as_str() == s)
}
