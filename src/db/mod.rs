use anyhow::Result;
use chrono::Weekday;
use rusqlite::Connection;
use std::path::PathBuf;

use crate::config::Config;

mod appointments;
mod customers;
mod directory;
mod schema;

pub use directory::SeedSummary;
pub use schema::SCHEMA_VERSION;

pub struct Database {
    conn: Connection,
    week_start: Weekday,
}

impl Database {
    /// Open the configured database, creating it if needed, running migrations
    pub fn open(config: &Config) -> Result<Self> {
        let db = Self::open_at(config.db_path.clone())?;
        Ok(db.with_week_start(config.week_start))
    }

    pub fn open_at(path: PathBuf) -> Result<Self> {
        // Create parent directories
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        tracing::debug!(path = %path.display(), "opened database");

        let db = Self {
            conn,
            week_start: Weekday::Sun,
        };
        db.migrate()?;
        Ok(db)
    }

    /// Open in-memory database for testing
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let db = Self {
            conn,
            week_start: Weekday::Sun,
        };
        db.migrate()?;
        Ok(db)
    }

    /// First day used by the current-week query.
    pub fn with_week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    fn migrate(&self) -> Result<()> {
        let version = self.get_schema_version()?;

        if version == 0 {
            // Run migration in a transaction for atomicity
            self.conn
                .execute_batch(&format!("BEGIN TRANSACTION; {} COMMIT;", schema::SCHEMA_V1))?;
            self.set_schema_version(SCHEMA_VERSION)?;
            tracing::info!(version = SCHEMA_VERSION, "created database schema");
        }

        Ok(())
    }

    fn get_schema_version(&self) -> Result<i32> {
        let result: Result<i32, _> =
            self.conn
                .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                    row.get(0)
                });

        match result {
            Ok(v) => Ok(v),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
            Err(rusqlite::Error::SqliteFailure(err, msg)) => {
                // "no such table" is error code 1 (SQLITE_ERROR)
                if err.code == rusqlite::ErrorCode::Unknown
                    && msg.as_ref().map_or(false, |m| m.contains("no such table"))
                {
                    Ok(0)
                } else {
                    Err(rusqlite::Error::SqliteFailure(err, msg).into())
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    fn set_schema_version(&self, version: i32) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO schema_version (id, version) VALUES (1, ?)",
            [version],
        )?;
        Ok(())
    }
}

/// Parse a stored timestamp inside a row mapper.
fn parse_stored_time(
    column: usize,
    text: &str,
) -> rusqlite::Result<chrono::DateTime<chrono::Utc>> {
    crate::time::from_storage_str(text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}
