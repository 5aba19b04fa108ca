//! SQLite access to scraped event and fight records

use crate::Result;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::events::RawEvent;

/// Database connection and operations
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Same layout the scrapers write
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS events (
                id TEXT PRIMARY KEY,
                name TEXT,
                date TEXT,
                location TEXT,
                url TEXT
            );

            CREATE TABLE IF NOT EXISTS fights (
                fight_id TEXT PRIMARY KEY,
                event_id TEXT,
                winner TEXT,
                loser TEXT,
                method TEXT,
                round INTEGER,
                time TEXT,
                weight_class TEXT,
                FOREIGN KEY(event_id) REFERENCES events(id)
            );
            "#,
        )?;
        Ok(())
    }

    // ==================== Fixtures ====================

    /// Insert an event card
    pub fn insert_event(&self, id: &str, name: &str, date: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO events (id, name, date) VALUES (?1, ?2, ?3)",
            params![id, name, date],
        )?;
        Ok(())
    }

    /// Insert a fight on an existing card
    pub fn insert_fight(&self, fight_id: &str, event_id: &str, fight: &RawEvent) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO fights (fight_id, event_id, winner, loser, method, round, weight_class)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                fight_id,
                event_id,
                fight.winner,
                fight.loser,
                fight.method,
                fight.round,
                fight.weight_class
            ],
        )?;
        Ok(())
    }

    // ==================== Fight History ====================

    /// Every fight joined with its card date, in the order it was stored
    pub fn load_raw_events(&self) -> Result<Vec<RawEvent>> {
        let mut stmt = self.conn.prepare(
            "SELECT f.winner, f.loser, f.method, CAST(f.round AS TEXT), f.weight_class, e.date
             FROM fights f
             JOIN events e ON f.event_id = e.id
             ORDER BY f.rowid",
        )?;

        let events = stmt
            .query_map([], |row| {
                Ok(RawEvent {
                    winner: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                    loser: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    method: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    round: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                    weight_class: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                    date: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(events)
    }

    // ==================== Statistics ====================

    /// Get database statistics
    pub fn get_stats(&self) -> Result<DatabaseStats> {
        let event_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;

        let fight_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM fights", [], |row| row.get(0))?;

        let latest_event: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM events ORDER BY rowid DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?
            .flatten();

        Ok(DatabaseStats {
            event_count: event_count as usize,
            fight_count: fight_count as usize,
            latest_event,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DatabaseStats {
    pub event_count: usize,
    pub fight_count: usize,
    /// Most recently stored card
    pub latest_event: Option<String>,
}
