//! SQLite storage layer for the local copy of places and user preferences.
//!
//! Database schema (one file, created on first open):
//! - `places` table: position, id, name, rating, address, category, updated_at
//! - `preferences` table: key, value (INTEGER)
//! - `meta` table: key, value; `places_saved_at` marks that a list was saved

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::error::Result;
use super::models::Place;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS places (
        position INTEGER PRIMARY KEY,
        id TEXT,
        name TEXT NOT NULL,
        rating REAL NOT NULL,
        address TEXT,
        category TEXT,
        updated_at TEXT
    );
    CREATE TABLE IF NOT EXISTS preferences (
        key TEXT PRIMARY KEY,
        value INTEGER NOT NULL
    );
    CREATE TABLE IF NOT EXISTS meta (
        key TEXT PRIMARY KEY,
        value TEXT
    );
";

const SAVED_AT_KEY: &str = "places_saved_at";

/// Parse a timestamp string into a DateTime<Utc>
fn parse_timestamp(timestamp: Option<String>) -> Option<DateTime<Utc>> {
    timestamp.and_then(|t| {
        DateTime::parse_from_rfc3339(&t)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    })
}

fn place_from_row(row: &Row) -> rusqlite::Result<Place> {
    Ok(Place {
        id: row.get(0)?,
        name: row.get(1)?,
        rating: row.get(2)?,
        address: row.get(3)?,
        category: row.get(4)?,
        updated_at: parse_timestamp(row.get(5)?),
    })
}

/// Persistence for places and preferences in a single SQLite file
#[derive(Debug, Clone)]
pub struct Storage {
    db_path: PathBuf,
}

impl Storage {
    /// Create a new Storage instance pointing at a database file
    pub fn new(db_path: PathBuf) -> Self {
        Storage { db_path }
    }

    /// Open a connection, creating the file and schema if needed
    fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(&self.db_path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(conn)
    }

    /// Load the saved place list. `None` means no list was ever saved.
    pub fn load_places(&self) -> Result<Option<Vec<Place>>> {
        let conn = self.open()?;

        let saved: Option<String> = conn
            .query_row(
                "SELECT value FROM meta WHERE key = ?1",
                [SAVED_AT_KEY],
                |row| row.get(0),
            )
            .optional()?;
        if saved.is_none() {
            return Ok(None);
        }

        let mut stmt = conn.prepare(
            "SELECT id, name, rating, address, category, updated_at
             FROM places ORDER BY position",
        )?;
        let places = stmt
            .query_map([], place_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some(places))
    }

    /// Replace the saved place list in a single transaction
    pub fn save_places(&self, places: &[Place]) -> Result<()> {
        let mut conn = self.open()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM places", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO places (position, id, name, rating, address, category, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for (position, place) in places.iter().enumerate() {
                stmt.execute(params![
                    position as i64,
                    place.id,
                    place.name,
                    place.rating,
                    place.address,
                    place.category,
                    place.updated_at.map(|t| t.to_rfc3339()),
                ])?;
            }
        }
        tx.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES (?1, ?2)",
            params![SAVED_AT_KEY, Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;

        debug!(count = places.len(), path = ?self.db_path, "saved places");
        Ok(())
    }

    /// Read an integer preference
    pub fn get_int(&self, key: &str) -> Result<Option<i64>> {
        let conn = self.open()?;
        let value = conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Write an integer preference
    pub fn set_int(&self, key: &str, value: i64) -> Result<()> {
        let conn = self.open()?;
        conn.execute(
            "INSERT OR REPLACE INTO preferences (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}
