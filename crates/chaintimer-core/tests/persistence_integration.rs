//! Persistence round-trips through an on-disk store, across reopen.

use chaintimer_core::settings::{ProgressStyle, RepeatStyle, Settings};
use chaintimer_core::storage::{Store, STORE_VERSION, VERSION_KEY};
use chaintimer_core::timer::{Timer, TimerField};
use chaintimer_core::wakeup::MemoryWakeupBackend;
use chaintimer_core::{AppData, TimerGroup};

fn backend() -> Box<MemoryWakeupBackend> {
    Box::new(MemoryWakeupBackend::new())
}

#[test]
fn state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chaintimer.db");

    {
        let store = Store::open(&path).unwrap();
        let mut app = AppData::new(backend());
        let mut group = TimerGroup::new(Settings {
            repeat_style: RepeatStyle::Group,
            progress_style: ProgressStyle::Auto,
            ..Settings::default()
        });
        let mut timer = Timer::new(app.next_timer_id());
        timer.set_all(0, 10, 30);
        timer.start(1_000);
        timer.update(1_004);
        group.add_timer(timer);
        app.add_group(group);
        app.save(&store).unwrap();
    }

    let store = Store::open(&path).unwrap();
    let app = AppData::load(&store, backend());
    assert_eq!(app.group_count(), 1);
    let timer = app.timer(0, 0).unwrap();
    assert!(timer.is_running());
    assert_eq!(timer.elapsed_seconds(), 4);
    assert_eq!(timer.field(TimerField::Minutes), 10);
    assert_eq!(
        app.group(0).unwrap().settings().progress_style,
        ProgressStyle::Auto
    );
}

#[test]
fn repeated_save_replaces_previous_stream() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chaintimer.db");
    let store = Store::open(&path).unwrap();

    let mut app = AppData::new(backend());
    for _ in 0..3 {
        app.add_group(TimerGroup::default());
    }
    app.save(&store).unwrap();

    app.remove_group(2);
    app.remove_group(1);
    app.save(&store).unwrap();

    let loaded = AppData::load(&store, backend());
    assert_eq!(loaded.group_count(), 1);
}

#[test]
fn stale_version_discards_state_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chaintimer.db");

    {
        let store = Store::open(&path).unwrap();
        let mut app = AppData::new(backend());
        app.add_group(TimerGroup::default());
        app.save(&store).unwrap();
        store.write_int(VERSION_KEY, STORE_VERSION + 1).unwrap();
    }

    let store = Store::open(&path).unwrap();
    let app = AppData::load(&store, backend());
    assert_eq!(app.group_count(), 0);
}
