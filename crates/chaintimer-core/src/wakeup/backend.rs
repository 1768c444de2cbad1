//! Platform wakeup facility boundary.
//!
//! The OS-level facility is a request to relaunch/resume the app at a future
//! wall-clock time, surviving app suspension. The manager talks to it only
//! through [`WakeupBackend`], so tests and the host build can substitute
//! their own.

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::debug;

use crate::error::ScheduleError;

/// Handle the platform assigns to a pending wakeup request.
pub type WakeupId = i64;

/// The platform allows this many pending wakeups per app.
pub const MAX_PENDING_WAKEUPS: usize = 8;

pub trait WakeupBackend {
    /// Request a wake at `fire_at` (epoch seconds), tagged with `cookie`
    /// (the timer id). Returns the platform's wakeup id.
    fn schedule(&mut self, fire_at: i64, cookie: u32) -> Result<WakeupId, ScheduleError>;

    /// Cancel a pending request. Unknown ids are ignored.
    fn cancel(&mut self, wakeup_id: WakeupId);

    /// Deliver the next wakeup that has fired by `now`, if any. Covers both
    /// the launch event after a relaunch and fires while the app is running.
    fn take_fired(&mut self, now: i64) -> Option<(WakeupId, u32)>;
}

/// Host-side backend over the app's SQLite store.
///
/// There is no wake-from-sleep facility on a desktop host, so pending
/// requests are persisted in a `wakeups` table and any that have come due
/// are delivered at the next invocation -- the same observable behavior as
/// a device relaunching the app when its wakeup fires.
pub struct StoredWakeupBackend {
    conn: Connection,
}

impl StoredWakeupBackend {
    pub fn open(path: &std::path::Path) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, rusqlite::Error> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS wakeups (
                id       INTEGER PRIMARY KEY AUTOINCREMENT,
                fire_at  INTEGER NOT NULL,
                timer_id INTEGER NOT NULL
            );",
        )?;
        Ok(Self { conn })
    }

    fn pending_count(&self) -> Result<usize, rusqlite::Error> {
        self.conn
            .query_row("SELECT COUNT(*) FROM wakeups", [], |row| row.get::<_, i64>(0))
            .map(|n| n as usize)
    }
}

impl WakeupBackend for StoredWakeupBackend {
    fn schedule(&mut self, fire_at: i64, cookie: u32) -> Result<WakeupId, ScheduleError> {
        if fire_at < Utc::now().timestamp() {
            return Err(ScheduleError::OutOfRange);
        }
        match self.pending_count() {
            Ok(n) if n >= MAX_PENDING_WAKEUPS => return Err(ScheduleError::OutOfResources),
            Ok(_) => {}
            Err(_) => return Err(ScheduleError::Internal),
        }
        self.conn
            .execute(
                "INSERT INTO wakeups (fire_at, timer_id) VALUES (?1, ?2)",
                params![fire_at, cookie as i64],
            )
            .map_err(|_| ScheduleError::Internal)?;
        Ok(self.conn.last_insert_rowid())
    }

    fn cancel(&mut self, wakeup_id: WakeupId) {
        if let Err(e) = self
            .conn
            .execute("DELETE FROM wakeups WHERE id = ?1", params![wakeup_id])
        {
            debug!(wakeup_id, error = %e, "cancel: delete failed");
        }
    }

    fn take_fired(&mut self, now: i64) -> Option<(WakeupId, u32)> {
        let row = self
            .conn
            .query_row(
                "SELECT id, timer_id FROM wakeups WHERE fire_at <= ?1 ORDER BY fire_at LIMIT 1",
                params![now],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
            )
            .ok()?;
        self.cancel(row.0);
        Some((row.0, row.1 as u32))
    }
}

/// In-memory backend with injectable failures, for tests.
pub struct MemoryWakeupBackend {
    next_id: WakeupId,
    pub pending: Vec<(WakeupId, i64, u32)>,
    /// Next `schedule` call fails with this error.
    pub fail_next: Option<ScheduleError>,
}

impl MemoryWakeupBackend {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            pending: Vec::new(),
            fail_next: None,
        }
    }
}

impl Default for MemoryWakeupBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl WakeupBackend for MemoryWakeupBackend {
    fn schedule(&mut self, fire_at: i64, cookie: u32) -> Result<WakeupId, ScheduleError> {
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }
        if self.pending.len() >= MAX_PENDING_WAKEUPS {
            return Err(ScheduleError::OutOfResources);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push((id, fire_at, cookie));
        Ok(id)
    }

    fn cancel(&mut self, wakeup_id: WakeupId) {
        self.pending.retain(|(id, _, _)| *id != wakeup_id);
    }

    fn take_fired(&mut self, now: i64) -> Option<(WakeupId, u32)> {
        let pos = self.pending.iter().position(|(_, fire_at, _)| *fire_at <= now)?;
        let (id, _, cookie) = self.pending.remove(pos);
        Some((id, cookie))
    }
}
