//! Root aggregate: all timer groups, the global settings, and the wakeup
//! manager.
//!
//! One `AppData` exists per process. It is constructed in `main` (loaded
//! from the store, or default if the store is empty or stale) and passed by
//! reference into whatever needs it; constructing it is also the single
//! point where the wakeup backend is handed over, so the platform facility
//! can never end up with two subscribers.
//!
//! Save and load replay the identical record order through a shared cursor:
//! version, then per group (timer count, timers, settings), then the global
//! settings, then the wakeup entry list.

use tracing::{info, warn};

use crate::error::StoreError;
use crate::group::TimerGroup;
use crate::settings::Settings;
use crate::storage::{Cursor, Store, HIGH_WATER_KEY, STORE_VERSION, VERSION_KEY};
use crate::timer::Timer;
use crate::wakeup::{WakeupBackend, WakeupEntry, WakeupManager};

pub struct AppData {
    groups: Vec<TimerGroup>,
    settings: Settings,
    wakeups: WakeupManager,
}

impl AppData {
    pub fn new(backend: Box<dyn WakeupBackend>) -> Self {
        Self {
            groups: Vec::new(),
            settings: Settings::default(),
            wakeups: WakeupManager::new(backend),
        }
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Load persisted state, or start fresh when the store is empty, from
    /// another schema version, or unreadable. Never fails: a broken store
    /// is an expected external condition, recovered locally.
    pub fn load(store: &Store, backend: Box<dyn WakeupBackend>) -> Self {
        match Self::replay(store) {
            Ok((groups, settings, entries)) => Self {
                groups,
                settings,
                wakeups: WakeupManager::with_entries(entries, backend),
            },
            Err(StoreError::MissingRecord(VERSION_KEY)) => {
                info!("no persisted state, starting fresh");
                Self::new(backend)
            }
            Err(e @ StoreError::VersionMismatch { .. }) => {
                warn!(error = %e, "discarding persisted state");
                Self::new(backend)
            }
            Err(e) => {
                warn!(error = %e, "failed to load persisted state, starting fresh");
                Self::new(backend)
            }
        }
    }

    fn replay(store: &Store) -> Result<(Vec<TimerGroup>, Settings, Vec<WakeupEntry>), StoreError> {
        if !store.exists(VERSION_KEY)? {
            return Err(StoreError::MissingRecord(VERSION_KEY));
        }
        let found = store.read_int(VERSION_KEY)?;
        if found != STORE_VERSION {
            return Err(StoreError::VersionMismatch {
                found,
                expected: STORE_VERSION,
            });
        }

        let mut cursor = Cursor::new();
        let group_count = store.read_int(cursor.next())?;
        let mut groups = Vec::with_capacity(group_count.max(0) as usize);
        for _ in 0..group_count {
            let timer_count = store.read_int(cursor.next())?;
            let mut timers = Vec::with_capacity(timer_count.max(0) as usize);
            for _ in 0..timer_count {
                timers.push(store.read_record::<Timer>(cursor.next())?);
            }
            let settings: Settings = store.read_record(cursor.next())?;
            let mut group = TimerGroup::new(settings);
            for timer in timers {
                group.add_timer(timer);
            }
            groups.push(group);
        }
        let settings: Settings = store.read_record(cursor.next())?;
        let entry_count = store.read_int(cursor.next())?;
        let mut entries = Vec::with_capacity(entry_count.max(0) as usize);
        for _ in 0..entry_count {
            entries.push(store.read_record::<WakeupEntry>(cursor.next())?);
        }

        // Cross-check against the high-water key the last save wrote; a
        // mismatch means the replay consumed a different number of records
        // than were written.
        if store.exists(HIGH_WATER_KEY)? {
            let high_water = store.read_int(HIGH_WATER_KEY)?;
            debug_assert_eq!(high_water, cursor.position(), "record stream length mismatch");
        }

        Ok((groups, settings, entries))
    }

    /// Write all state, mirroring the load order exactly.
    pub fn save(&self, store: &Store) -> Result<(), StoreError> {
        store.clear()?;
        store.write_int(VERSION_KEY, STORE_VERSION)?;

        let mut cursor = Cursor::new();
        store.write_int(cursor.next(), self.groups.len() as i64)?;
        for group in &self.groups {
            store.write_int(cursor.next(), group.len() as i64)?;
            for timer in group.timers() {
                store.write_record(cursor.next(), timer)?;
            }
            store.write_record(cursor.next(), group.settings())?;
        }
        store.write_record(cursor.next(), &self.settings)?;
        store.write_int(cursor.next(), self.wakeups.len() as i64)?;
        for entry in self.wakeups.entries() {
            store.write_record(cursor.next(), entry)?;
        }

        store.write_int(HIGH_WATER_KEY, cursor.position())?;
        Ok(())
    }

    // ── Groups ───────────────────────────────────────────────────────

    pub fn groups(&self) -> &[TimerGroup] {
        &self.groups
    }

    pub fn add_group(&mut self, group: TimerGroup) {
        self.groups.push(group);
    }

    /// Delete a group, first canceling any outstanding wakeup for its
    /// timers. Returns the removed group.
    pub fn remove_group(&mut self, index: usize) -> Option<TimerGroup> {
        if index >= self.groups.len() {
            debug_assert!(false, "remove_group: index out of bounds");
            return None;
        }
        self.groups[index].cancel_wakeups(&mut self.wakeups);
        Some(self.groups.remove(index))
    }

    pub fn group(&self, index: usize) -> Option<&TimerGroup> {
        self.groups.get(index)
    }

    pub fn group_mut(&mut self, index: usize) -> Option<&mut TimerGroup> {
        self.groups.get_mut(index)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    // ── Timers ───────────────────────────────────────────────────────

    pub fn timer(&self, group_index: usize, timer_index: usize) -> Option<&Timer> {
        self.groups.get(group_index)?.timer(timer_index)
    }

    pub fn timer_mut(&mut self, group_index: usize, timer_index: usize) -> Option<&mut Timer> {
        self.groups.get_mut(group_index)?.timer_mut(timer_index)
    }

    pub fn timer_by_id(&self, timer_id: u32) -> Option<&Timer> {
        self.groups.iter().find_map(|g| g.timer_by_id(timer_id))
    }

    pub fn timer_by_id_mut(&mut self, timer_id: u32) -> Option<&mut Timer> {
        self.groups
            .iter_mut()
            .find_map(|g| g.timer_by_id_mut(timer_id))
    }

    pub fn group_index_by_timer_id(&self, timer_id: u32) -> Option<usize> {
        self.groups
            .iter()
            .position(|g| g.timer_index_by_id(timer_id).is_some())
    }

    /// Smallest non-negative id not currently in use by any timer.
    ///
    /// O(n) probe from 0; ids freed by deletion are reused, so an id is only
    /// stable for the lifetime of its timer.
    pub fn next_timer_id(&self) -> u32 {
        let mut candidate = 0;
        while self.timer_by_id(candidate).is_some() {
            candidate += 1;
        }
        candidate
    }

    // ── Settings & wakeups ───────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn wakeups(&self) -> &WakeupManager {
        &self.wakeups
    }

    pub fn wakeups_mut(&mut self) -> &mut WakeupManager {
        &mut self.wakeups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wakeup::MemoryWakeupBackend;

    fn app() -> AppData {
        AppData::new(Box::new(MemoryWakeupBackend::new()))
    }

    fn add_timer_with_id(app: &mut AppData, group_index: usize, id: u32) {
        let mut t = Timer::new(id);
        t.set_all(0, 0, 5);
        app.group_mut(group_index).unwrap().add_timer(t);
    }

    #[test]
    fn next_timer_id_fills_gaps() {
        let mut app = app();
        app.add_group(TimerGroup::default());
        for id in [0, 1, 3] {
            add_timer_with_id(&mut app, 0, id);
        }
        assert_eq!(app.next_timer_id(), 2);
    }

    #[test]
    fn next_timer_id_starts_at_zero() {
        assert_eq!(app().next_timer_id(), 0);
    }

    #[test]
    fn lookup_spans_groups() {
        let mut app = app();
        app.add_group(TimerGroup::default());
        app.add_group(TimerGroup::default());
        add_timer_with_id(&mut app, 0, 0);
        add_timer_with_id(&mut app, 1, 7);
        assert_eq!(app.group_index_by_timer_id(7), Some(1));
        assert!(app.timer_by_id(7).is_some());
        assert_eq!(app.timer(1, 0).map(|t| t.id()), Some(7));
        assert!(app.timer(2, 0).is_none());
    }

    #[test]
    fn remove_group_cancels_its_wakeups() {
        let mut app = app();
        app.add_group(TimerGroup::default());
        add_timer_with_id(&mut app, 0, 0);
        let timer = app.timer(0, 0).unwrap().clone();
        app.wakeups_mut().schedule(&timer, 0);
        assert_eq!(app.wakeups().len(), 1);

        app.remove_group(0);
        assert!(app.wakeups().is_empty());
        assert_eq!(app.group_count(), 0);
    }

    #[test]
    fn save_load_round_trip() {
        let store = Store::open_in_memory().unwrap();
        let mut app = app();
        let mut group = TimerGroup::new(Settings {
            repeat_style: crate::settings::RepeatStyle::Group,
            ..Settings::default()
        });
        let mut t = Timer::new(0);
        t.set_all(1, 2, 3);
        t.start(50);
        group.add_timer(t);
        app.add_group(group);
        let timer = app.timer(0, 0).unwrap().clone();
        app.wakeups_mut().schedule(&timer, 50);
        app.save(&store).unwrap();

        let loaded = AppData::load(&store, Box::new(MemoryWakeupBackend::new()));
        assert_eq!(loaded.group_count(), 1);
        let t = loaded.timer(0, 0).unwrap();
        assert_eq!(t.length_seconds(), 3723);
        assert!(t.is_running());
        assert_eq!(
            loaded.group(0).unwrap().settings().repeat_style,
            crate::settings::RepeatStyle::Group
        );
        assert_eq!(loaded.wakeups().len(), 1);
        assert_eq!(loaded.wakeups().entries()[0].timer_id, 0);
    }

    #[test]
    fn version_mismatch_starts_fresh() {
        let store = Store::open_in_memory().unwrap();
        let mut app = app();
        app.add_group(TimerGroup::default());
        app.save(&store).unwrap();

        store.write_int(VERSION_KEY, STORE_VERSION + 1).unwrap();
        let loaded = AppData::load(&store, Box::new(MemoryWakeupBackend::new()));
        assert_eq!(loaded.group_count(), 0);
    }

    #[test]
    fn empty_store_starts_fresh() {
        let store = Store::open_in_memory().unwrap();
        let loaded = AppData::load(&store, Box::new(MemoryWakeupBackend::new()));
        assert_eq!(loaded.group_count(), 0);
        assert!(loaded.wakeups().is_empty());
    }
}
