//! Tests for availability records, window resolution and editing.

use chrono::{NaiveDate, Weekday};
use slot_engine::availability::{resolve_windows, windows_for, Availability, DailyWindow, WeeklyAvailability};
use slot_engine::SchedulerError;

// ── Helpers ─────────────────────────────────────────────────────────────────

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 2026-03-15 is a Sunday; the following days run Monday to Saturday.
fn sunday() -> NaiveDate {
    date(2026, 3, 15)
}

fn nine_to_five() -> DailyWindow {
    DailyWindow::new("09:00", "17:00")
}

// ── Defaults ────────────────────────────────────────────────────────────────

#[test]
fn default_week_is_weekdays_nine_to_five() {
    let avail = Availability::default();

    for offset in 0..7 {
        let day = sunday() + chrono::Duration::days(offset);
        let windows = windows_for(Some(&avail), day);
        if offset == 0 || offset == 6 {
            assert!(windows.is_empty(), "{day} should be closed");
        } else {
            assert_eq!(windows, vec![nine_to_five()], "{day} should be open");
        }
    }
    assert_eq!(avail.blackouts().count(), 0);
}

#[test]
fn no_availability_falls_back_to_eight_to_six() {
    let windows = windows_for(None, sunday());
    assert_eq!(windows, vec![DailyWindow::new("08:00", "18:00")]);
}

#[test]
fn unconfigured_weekday_falls_back() {
    let mut weekly = WeeklyAvailability::new();
    weekly.set(Weekday::Mon, vec![nine_to_five()]);
    let avail = Availability {
        weekly,
        blackout_dates: Default::default(),
    };

    // Tuesday has no key at all.
    assert_eq!(windows_for(Some(&avail), date(2026, 3, 17)), vec![DailyWindow::fallback()]);
}

#[test]
fn explicit_empty_day_stays_closed() {
    let avail = Availability::default();
    assert!(windows_for(Some(&avail), sunday()).is_empty());
}

#[test]
fn blackout_closes_an_open_day() {
    let mut avail = Availability::default();
    let monday = date(2026, 3, 16);
    avail.add_blackout(monday);

    assert!(windows_for(Some(&avail), monday).is_empty());
    assert_eq!(windows_for(Some(&avail), date(2026, 3, 23)), vec![nine_to_five()]);
}

#[test]
fn custom_fallback_window() {
    let fallback = DailyWindow::new("10:00", "14:00");
    assert_eq!(resolve_windows(None, sunday(), &fallback), vec![fallback.clone()]);
}

#[test]
fn declaration_order_is_preserved() {
    let mut avail = Availability::default();
    avail.weekly.set(
        Weekday::Wed,
        vec![DailyWindow::new("13:00", "17:00"), DailyWindow::new("08:00", "12:00")],
    );
    let windows = windows_for(Some(&avail), date(2026, 3, 18));
    assert_eq!(windows[0].start, "13:00");
    assert_eq!(windows[1].start, "08:00");
}

// ── Windows ─────────────────────────────────────────────────────────────────

#[test]
fn window_bounds_in_minutes() {
    assert_eq!(nine_to_five().bounds().unwrap(), (540, 1020));
}

#[test]
fn empty_or_inverted_window_is_invalid() {
    for (s, e) in [("09:00", "09:00"), ("17:00", "09:00")] {
        let err = DailyWindow::new(s, e).bounds().unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidWindow { .. }));
    }
}

#[test]
fn unparseable_window_is_invalid_time() {
    let err = DailyWindow::new("nine", "17:00").bounds().unwrap_err();
    assert_eq!(err, SchedulerError::InvalidTime("nine".to_string()));
}

#[test]
fn lenient_bounds_read_garbage_as_midnight() {
    assert_eq!(DailyWindow::new("nine", "17:00").lenient_bounds(), (0, 1020));
}

#[test]
fn window_may_close_at_end_of_day() {
    assert_eq!(DailyWindow::new("22:00", "24:00").bounds().unwrap(), (1320, 1440));
    assert_eq!(DailyWindow::new("22:00", "24:00").lenient_bounds(), (1320, 1440));
}

#[test]
fn end_of_day_is_not_a_start() {
    let err = DailyWindow::new("24:00", "24:00").bounds().unwrap_err();
    assert_eq!(err, SchedulerError::InvalidTime("24:00".to_string()));
}

// ── Editing ─────────────────────────────────────────────────────────────────

#[test]
fn add_window_appends_nine_to_five() {
    let mut avail = Availability::default();
    avail.add_window(Weekday::Sat);
    assert_eq!(avail.weekly.get(Weekday::Sat), Some(&[nine_to_five()][..]));

    avail.add_window(Weekday::Mon);
    assert_eq!(avail.weekly.get(Weekday::Mon).unwrap().len(), 2);
}

#[test]
fn update_and_remove_window() {
    let mut avail = Availability::default();
    let previous = avail.update_window(Weekday::Tue, 0, DailyWindow::new("10:00", "15:00"));
    assert_eq!(previous, Some(nine_to_five()));
    assert_eq!(avail.weekly.get(Weekday::Tue).unwrap()[0].end, "15:00");

    let removed = avail.remove_window(Weekday::Tue, 0);
    assert_eq!(removed, Some(DailyWindow::new("10:00", "15:00")));
    // Removing the last window leaves the day closed, not unconfigured.
    assert_eq!(avail.weekly.get(Weekday::Tue), Some(&[][..]));
}

#[test]
fn out_of_range_edits_are_no_ops() {
    let mut avail = Availability::default();
    assert_eq!(avail.remove_window(Weekday::Mon, 3), None);
    assert_eq!(avail.update_window(Weekday::Mon, 3, nine_to_five()), None);
    assert_eq!(avail, Availability::default());
}

#[test]
fn edits_on_unconfigured_day_do_not_close_it() {
    let mut avail = Availability {
        weekly: WeeklyAvailability::new(),
        blackout_dates: Default::default(),
    };
    assert_eq!(avail.remove_window(Weekday::Mon, 0), None);
    assert_eq!(avail.weekly.get(Weekday::Mon), None);
}

#[test]
fn blackouts_are_unique_and_sorted() {
    let mut avail = Availability::default();
    assert!(avail.add_blackout(date(2026, 12, 25)));
    assert!(avail.add_blackout(date(2026, 1, 1)));
    assert!(!avail.add_blackout(date(2026, 12, 25)));

    let dates: Vec<_> = avail.blackouts().collect();
    assert_eq!(dates, vec![date(2026, 1, 1), date(2026, 12, 25)]);

    assert!(avail.remove_blackout(date(2026, 1, 1)));
    assert!(!avail.remove_blackout(date(2026, 1, 1)));
    assert_eq!(avail.blackouts().count(), 1);
}

#[test]
fn validate_lists_every_bad_window() {
    let mut avail = Availability::default();
    avail.weekly.set(
        Weekday::Mon,
        vec![nine_to_five(), DailyWindow::new("12:00", "11:00")],
    );
    avail.weekly.set(Weekday::Fri, vec![DailyWindow::new("9", "17:00")]);

    let issues = avail.validate();
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].weekday, Weekday::Mon);
    assert_eq!(issues[0].index, 1);
    assert_eq!(issues[1].weekday, Weekday::Fri);
    assert_eq!(issues[1].index, 0);

    assert!(Availability::default().validate().is_empty());
}

// ── Serialization ───────────────────────────────────────────────────────────

#[test]
fn reads_client_json() {
    let json = r#"{
        "weekly": {
            "0": [],
            "1": [{"start": "09:00", "end": "12:00"}, {"start": "13:00", "end": "17:00"}],
            "6": []
        },
        "blackoutDates": ["2026-12-25", "2026-01-01"]
    }"#;
    let avail: Availability = serde_json::from_str(json).unwrap();

    assert_eq!(avail.weekly.get(Weekday::Mon).unwrap().len(), 2);
    assert_eq!(avail.weekly.get(Weekday::Sun), Some(&[][..]));
    assert_eq!(avail.weekly.get(Weekday::Tue), None);
    assert!(avail.is_blackout(date(2026, 1, 1)));
}

#[test]
fn missing_blackout_list_means_none() {
    let avail: Availability = serde_json::from_str(r#"{"weekly": {}}"#).unwrap();
    assert_eq!(avail.blackouts().count(), 0);
}

#[test]
fn record_without_weekly_falls_back_but_keeps_blackouts() {
    let avail: Availability = serde_json::from_str(r#"{"blackoutDates": ["2026-03-18"]}"#).unwrap();

    assert_eq!(avail.weekly, WeeklyAvailability::new());
    assert_eq!(windows_for(Some(&avail), date(2026, 3, 16)), vec![DailyWindow::fallback()]);
    assert_eq!(windows_for(Some(&avail), sunday()), vec![DailyWindow::fallback()]);
    assert!(windows_for(Some(&avail), date(2026, 3, 18)).is_empty());
}

#[test]
fn empty_record_falls_back_every_day() {
    let avail: Availability = serde_json::from_str("{}").unwrap();
    assert_eq!(avail.blackouts().count(), 0);
    assert_eq!(windows_for(Some(&avail), date(2026, 3, 21)), vec![DailyWindow::fallback()]);
}

#[test]
fn malformed_blackout_date_is_rejected() {
    let result: Result<Availability, _> =
        serde_json::from_str(r#"{"weekly": {}, "blackoutDates": ["tomorrow"]}"#);
    assert!(result.is_err());
}

#[test]
fn serializes_with_client_field_names() {
    let mut avail = Availability::default();
    avail.add_blackout(date(2026, 7, 4));
    let json = serde_json::to_value(&avail).unwrap();

    assert_eq!(json["blackoutDates"][0], "2026-07-04");
    assert_eq!(json["weekly"]["1"][0]["start"], "09:00");
}
