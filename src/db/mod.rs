//! Database module - SQLite key-value slots backing the history store

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};

/// Slot holding the encoded muscle history
pub const HISTORY_SLOT: &str = "workoutHistory";
/// Slot holding the encoded superset log
pub const SUPERSET_SLOT: &str = "supersetHistory";

/// Database wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Open a throwaway in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS slots (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Read a slot, `None` if it was never written
    pub fn get_slot(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    /// Write several slots in one transaction
    pub fn put_slots(&mut self, slots: &[(&str, &str)]) -> Result<()> {
        let tx = self.conn.transaction()?;
        for (key, value) in slots {
            tx.execute(
                "INSERT INTO slots (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Drop the slots table so every later write fails
    #[cfg(test)]
    pub(crate) fn drop_slots_table(&self) {
        self.conn.execute("DROP TABLE slots", []).unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_slot_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_slot(HISTORY_SLOT).unwrap().is_none());
    }

    #[test]
    fn test_put_then_get() {
        let mut db = Database::open_in_memory().unwrap();
        db.put_slots(&[(HISTORY_SLOT, "{}"), (SUPERSET_SLOT, "[]")]).unwrap();
        assert_eq!(db.get_slot(HISTORY_SLOT).unwrap().as_deref(), Some("{}"));
        assert_eq!(db.get_slot(SUPERSET_SLOT).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_put_overwrites() {
        let mut db = Database::open_in_memory().unwrap();
        db.put_slots(&[(SUPERSET_SLOT, "[]")]).unwrap();
        db.put_slots(&[(SUPERSET_SLOT, "[1]")]).unwrap();
        assert_eq!(db.get_slot(SUPERSET_SLOT).unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_put_fails_without_table() {
        let mut db = Database::open_in_memory().unwrap();
        db.drop_slots_table();
        assert!(db.put_slots(&[(HISTORY_SLOT, "{}")]).is_err());
    }

    #[test]
    fn test_reopen_keeps_slots() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("supersets.db");
        let path = path.to_str().unwrap();

        {
            let mut db = Database::open(path).unwrap();
            db.put_slots(&[(HISTORY_SLOT, "{\"legs\":null}")]).unwrap();
        }

        let db = Database::open(path).unwrap();
        assert_eq!(db.get_slot(HISTORY_SLOT).unwrap().as_deref(), Some("{\"legs\":null}"));
    }
}
