use chrono::{NaiveDate, NaiveDateTime};
use event_reminder_core::{
    resolve_due_events, send_notifications, send_notifications_at, DueEvents, EventStore,
    FixedClock, NotificationOutcome, NotifyError,
};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, s))
        .unwrap()
}

fn store_at(now: NaiveDateTime) -> EventStore {
    EventStore::open_in_memory_with_clock(Box::new(FixedClock::new(now))).unwrap()
}

#[test]
fn empty_day_is_reported_as_no_events_today() {
    let store = store_at(at(2024, 2, 12, 8, 0, 0));
    store.create("tomorrow", at(2024, 2, 13, 9, 0, 0), "").unwrap();

    let due = resolve_due_events(&store, store.now()).unwrap();
    assert_eq!(due, DueEvents::NoEventsToday);
    assert!(due.is_empty());

    let outcome = send_notifications(&store).unwrap();
    assert_eq!(outcome, NotificationOutcome::NoEventsToday);
    assert!(outcome.reminders().is_empty());
}

#[test]
fn only_events_from_now_until_midnight_are_notified() {
    let store = store_at(at(2024, 2, 12, 18, 0, 0));
    let earlier = store.create("Standup", at(2024, 2, 12, 18, 20, 0), "").unwrap();
    let later = store
        .create("Презентация", at(2024, 2, 12, 18, 39, 0), "Презентация нового продукта")
        .unwrap();
    let tomorrow = store.create("Tomorrow", at(2024, 2, 13, 0, 0, 0), "").unwrap();

    let outcome = send_notifications_at(&store, at(2024, 2, 12, 18, 30, 0)).unwrap();

    let reminders = outcome.reminders();
    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0].event_id, later);
    assert_eq!(
        reminders[0].message,
        "Reminder: event \"Презентация\" starts at 2024-02-12 18:39. Презентация нового продукта"
    );

    assert!(store.get(later).unwrap().unwrap().is_notified());
    assert!(!store.get(earlier).unwrap().unwrap().is_notified());
    assert!(!store.get(tomorrow).unwrap().unwrap().is_notified());
}

#[test]
fn second_run_produces_no_reminders_for_same_events() {
    let store = store_at(at(2024, 1, 5, 9, 0, 0));
    let first = store.create("a", at(2024, 1, 5, 10, 0, 0), "").unwrap();
    let second = store.create("b", at(2024, 1, 5, 23, 59, 59), "").unwrap();

    let outcome = send_notifications(&store).unwrap();
    let ids = outcome
        .reminders()
        .iter()
        .map(|reminder| reminder.event_id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![first, second]);

    assert_eq!(
        send_notifications(&store).unwrap(),
        NotificationOutcome::NoEventsToday
    );
}

#[test]
fn event_exactly_at_now_is_due() {
    let store = store_at(at(2024, 1, 5, 9, 0, 0));
    let id = store.create("now", at(2024, 1, 5, 9, 0, 0), "").unwrap();

    let outcome = send_notifications(&store).unwrap();
    assert_eq!(outcome.reminders()[0].event_id, id);
}

#[test]
fn resolver_does_not_change_state() {
    let store = store_at(at(2024, 1, 5, 9, 0, 0));
    let id = store.create("a", at(2024, 1, 5, 10, 0, 0), "").unwrap();

    assert_eq!(resolve_due_events(&store, store.now()).unwrap().len(), 1);
    assert_eq!(resolve_due_events(&store, store.now()).unwrap().len(), 1);
    assert!(!store.get(id).unwrap().unwrap().is_notified());
}

#[test]
fn storage_failure_while_resolving_propagates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.db");
    let store =
        EventStore::open_with_clock(&path, Box::new(FixedClock::new(at(2024, 1, 5, 9, 0, 0))))
            .unwrap();
    store.create("a", at(2024, 1, 5, 10, 0, 0), "").unwrap();

    let raw = rusqlite::Connection::open(&path).unwrap();
    raw.execute_batch("DROP TABLE events;").unwrap();
    drop(raw);

    let err = send_notifications(&store).unwrap_err();
    assert!(matches!(err, NotifyError::Resolve(_)));
}

#[test]
fn failed_mark_stops_batch_and_leaves_later_events_pending() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.db");
    let store =
        EventStore::open_with_clock(&path, Box::new(FixedClock::new(at(2024, 1, 5, 9, 0, 0))))
            .unwrap();
    let first = store.create("first", at(2024, 1, 5, 10, 0, 0), "").unwrap();
    let second = store.create("second", at(2024, 1, 5, 11, 0, 0), "").unwrap();
    let third = store.create("third", at(2024, 1, 5, 12, 0, 0), "").unwrap();

    let raw = rusqlite::Connection::open(&path).unwrap();
    raw.execute_batch(&format!(
        "CREATE TRIGGER refuse_second_mark BEFORE UPDATE ON events
         WHEN NEW.id = {}
         BEGIN SELECT RAISE(ABORT, 'mark refused'); END;",
        second.get()
    ))
    .unwrap();
    drop(raw);

    match send_notifications(&store).unwrap_err() {
        NotifyError::Mark {
            event_id,
            delivered,
            source,
        } => {
            assert_eq!(event_id, second);
            assert_eq!(delivered.len(), 1);
            assert_eq!(delivered[0].event_id, first);
            assert!(!source.is_rejection());
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(store.get(first).unwrap().unwrap().is_notified());
    assert!(!store.get(second).unwrap().unwrap().is_notified());
    assert!(!store.get(third).unwrap().unwrap().is_notified());
}
