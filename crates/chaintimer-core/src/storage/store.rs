//! Integer-keyed persisted record store.
//!
//! A thin sequential-record layer over SQLite: records are keyed by a
//! monotonically increasing integer cursor, and the load routine replays
//! them in exactly the order the save routine wrote them. Each record is a
//! self-describing JSON value -- never a raw struct image -- so a rebuild
//! with different field layout cannot silently corrupt saved state.
//!
//! Reserved keys: 0 holds the schema version, 1 holds the high-water key
//! written by the last save (cross-checked on load). Data records start at
//! key 2.

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use crate::error::StoreError;

/// Bumped whenever the record layout changes. A mismatch discards all
/// persisted state; there is no migration.
pub const STORE_VERSION: i64 = 1;

pub const VERSION_KEY: i64 = 0;
pub const HIGH_WATER_KEY: i64 = 1;
const FIRST_DATA_KEY: i64 = 2;

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the store at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS records (
                key   INTEGER PRIMARY KEY,
                value NOT NULL
            );",
        )?;
        Ok(())
    }

    pub fn exists(&self, key: i64) -> Result<bool, StoreError> {
        let found: Option<i64> = self
            .conn
            .query_row("SELECT key FROM records WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(found.is_some())
    }

    pub fn write_int(&self, key: i64, value: i64) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO records (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn read_int(&self, key: i64) -> Result<i64, StoreError> {
        self.conn
            .query_row("SELECT value FROM records WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?
            .ok_or(StoreError::MissingRecord(key))
    }

    pub fn write_record<T: Serialize>(&self, key: i64, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO records (key, value) VALUES (?1, ?2)",
            params![key, json],
        )?;
        Ok(())
    }

    pub fn read_record<T: DeserializeOwned>(&self, key: i64) -> Result<T, StoreError> {
        let json: Option<String> = self
            .conn
            .query_row("SELECT value FROM records WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        let json = json.ok_or(StoreError::MissingRecord(key))?;
        serde_json::from_str(&json).map_err(|source| StoreError::CorruptRecord { key, source })
    }

    /// Drop every record, reserved keys included. Save rewrites from scratch.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM records", [])?;
        Ok(())
    }
}

/// Shared incrementing key for the sequential replay.
///
/// Save and load must consume keys in the identical order; the high-water
/// cross-check on load catches a stream that came up short or long.
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    next: i64,
}

impl Cursor {
    pub fn new() -> Self {
        Self {
            next: FIRST_DATA_KEY,
        }
    }

    pub fn next(&mut self) -> i64 {
        let key = self.next;
        self.next += 1;
        key
    }

    /// Key the next call to `next()` would return.
    pub fn position(&self) -> i64 {
        self.next
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_round_trip() {
        let store = Store::open_in_memory().unwrap();
        store.write_int(5, -3).unwrap();
        assert_eq!(store.read_int(5).unwrap(), -3);
    }

    #[test]
    fn missing_key_is_reported() {
        let store = Store::open_in_memory().unwrap();
        assert!(!store.exists(9).unwrap());
        assert!(matches!(
            store.read_int(9),
            Err(StoreError::MissingRecord(9))
        ));
    }

    #[test]
    fn record_round_trip() {
        let store = Store::open_in_memory().unwrap();
        store.write_record(2, &vec![1u32, 2, 3]).unwrap();
        let back: Vec<u32> = store.read_record(2).unwrap();
        assert_eq!(back, vec![1, 2, 3]);
    }

    #[test]
    fn corrupt_record_is_detected() {
        let store = Store::open_in_memory().unwrap();
        store.write_record(2, &17u32).unwrap();
        let result: Result<Vec<u32>, _> = store.read_record(2);
        assert!(matches!(result, Err(StoreError::CorruptRecord { key: 2, .. })));
    }

    #[test]
    fn clear_removes_everything() {
        let store = Store::open_in_memory().unwrap();
        store.write_int(VERSION_KEY, STORE_VERSION).unwrap();
        store.write_int(2, 1).unwrap();
        store.clear().unwrap();
        assert!(!store.exists(VERSION_KEY).unwrap());
    }

    #[test]
    fn cursor_hands_out_sequential_keys() {
        let mut cursor = Cursor::new();
        assert_eq!(cursor.next(), 2);
        assert_eq!(cursor.next(), 3);
        assert_eq!(cursor.position(), 4);
    }
}
