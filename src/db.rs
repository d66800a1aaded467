use crate::harness::{BenchmarkResult, BenchmarkRun};
use rusqlite::{params, Connection, Result};
use std::path::Path;

/// Append-only run history backed by SQLite.
///
/// Results are stored with their position inside the run, so history always
/// reflects registration order regardless of how results were displayed.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(&conn)?;
        Ok(Self { conn })
    }

    fn init(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS runs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS results (
                run_id INTEGER NOT NULL REFERENCES runs(id),
                position INTEGER NOT NULL,
                name TEXT NOT NULL,
                hash TEXT NOT NULL,
                time_ms REAL NOT NULL,
                PRIMARY KEY (run_id, position)
            )",
            [],
        )?;
        Ok(())
    }

    /// Append one completed run and all of its results. Returns the run id.
    pub fn record_run(&mut self, run: &BenchmarkRun) -> Result<i64> {
        let tx = self.conn.transaction()?;

        tx.execute("INSERT INTO runs (date) VALUES (?1)", params![run.date])?;
        let run_id = tx.last_insert_rowid();

        for (position, result) in run.results.iter().enumerate() {
            tx.execute(
                "INSERT INTO results (run_id, position, name, hash, time_ms)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    run_id,
                    position as i64,
                    result.name,
                    result.hash,
                    result.time_ms
                ],
            )?;
        }

        tx.commit()?;
        Ok(run_id)
    }

    pub fn run_count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM runs", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn results_for_run(&self, run_id: i64) -> Result<Vec<BenchmarkResult>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, hash, time_ms FROM results
             WHERE run_id = ?1 ORDER BY position",
        )?;

        let rows = stmt.query_map(params![run_id], |row| {
            Ok(BenchmarkResult {
                name: row.get(0)?,
                hash: row.get(1)?,
                time_ms: row.get(2)?,
            })
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    /// All recorded runs, oldest first, each with its results in run order.
    pub fn load_history(&self) -> Result<Vec<BenchmarkRun>> {
        let mut stmt = self.conn.prepare("SELECT id, date FROM runs ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut headers = Vec::new();
        for row in rows {
            headers.push(row?);
        }

        let mut history = Vec::new();
        for (run_id, date) in headers {
            history.push(BenchmarkRun {
                date,
                results: self.results_for_run(run_id)?,
            });
        }
        Ok(history)
    }

    pub fn latest_run(&self) -> Result<Option<BenchmarkRun>> {
        let header = self
            .conn
            .query_row("SELECT id, date FROM runs ORDER BY id DESC LIMIT 1", [], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            });

        match header {
            Ok((run_id, date)) => Ok(Some(BenchmarkRun {
                date,
                results: self.results_for_run(run_id)?,
            })),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
