use chrono::{NaiveDate, NaiveDateTime};
use event_reminder_core::{
    DueEvents, FixedClock, NotificationOutcome, ReminderConfig, ReminderService, StoreError,
};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, s))
        .unwrap()
}

fn config_in(dir: &std::path::Path) -> ReminderConfig {
    ReminderConfig {
        database_path: dir.join("events.db"),
        export_path: dir.join("past_events.xlsx"),
        ..ReminderConfig::default()
    }
}

fn service_at(config: &ReminderConfig, now: NaiveDateTime) -> ReminderService {
    ReminderService::from_config_with_clock(config, Box::new(FixedClock::new(now))).unwrap()
}

#[test]
fn full_lifecycle_across_days() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let service = service_at(&config, at(2024, 1, 5, 8, 0, 0));
    let meeting = service
        .create_event("Client Meeting", at(2024, 1, 10, 9, 0, 0), "Meeting at the office")
        .unwrap();
    let scrapped = service
        .create_event("Scrapped", at(2024, 1, 10, 11, 0, 0), "")
        .unwrap();
    assert!(matches!(
        service.create_event("Ancient", at(2020, 1, 1, 0, 0, 0), ""),
        Err(StoreError::PastDateRejected { .. })
    ));
    service.delete_event(scrapped).unwrap();
    assert!(matches!(
        service.delete_event(scrapped),
        Err(StoreError::NotFound(_))
    ));
    assert_eq!(service.due_events().unwrap(), DueEvents::NoEventsToday);
    service.close().unwrap();

    let service = service_at(&config, at(2024, 1, 10, 7, 30, 0));
    assert_eq!(service.due_events().unwrap().len(), 1);
    match service.send_notifications().unwrap() {
        NotificationOutcome::Sent(reminders) => {
            assert_eq!(reminders.len(), 1);
            assert_eq!(reminders[0].event_id, meeting);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(
        service.send_notifications().unwrap(),
        NotificationOutcome::NoEventsToday
    );
    service.close().unwrap();

    let service = service_at(&config, at(2024, 1, 11, 0, 0, 0));
    assert_eq!(service.export_past_events().unwrap(), 1);
    assert!(service.export_path().exists());
    assert!(service.get_event(meeting).unwrap().unwrap().is_notified());
    service.close().unwrap();
}

#[test]
fn export_into_missing_directory_fails_without_creating_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.export_path = dir.path().join("missing").join("past_events.xlsx");

    let service = service_at(&config, at(2024, 1, 5, 8, 0, 0));
    assert!(service.export_past_events().is_err());
    assert!(!config.export_path.exists());
    service.close().unwrap();
}
