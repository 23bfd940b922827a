//! Tests for the interval overlap predicate and conflict reporting.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use slot_engine::conflict::{anchor_all, find_conflicts, overlaps, BookedInterval, Interval};

/// Helper to create an Interval from hour ranges on a given day.
fn interval(
    year: i32,
    month: u32,
    day: u32,
    start_hour: u32,
    start_min: u32,
    end_hour: u32,
    end_min: u32,
) -> Interval {
    let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
    Interval::new(
        date.and_hms_opt(start_hour, start_min, 0).unwrap(),
        date.and_hms_opt(end_hour, end_min, 0).unwrap(),
    )
}

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 16)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn booked_ten_to_eleven() -> Vec<Interval> {
    vec![interval(2026, 3, 16, 10, 0, 11, 0)]
}

#[test]
fn candidate_starting_inside_booking_conflicts() {
    assert!(overlaps(at(10, 30), at(11, 30), &booked_ten_to_eleven()));
}

#[test]
fn candidate_ending_inside_booking_conflicts() {
    assert!(overlaps(at(9, 30), at(10, 30), &booked_ten_to_eleven()));
}

#[test]
fn candidate_containing_booking_conflicts() {
    assert!(overlaps(at(9, 0), at(12, 0), &booked_ten_to_eleven()));
}

#[test]
fn candidate_inside_booking_conflicts() {
    assert!(overlaps(at(10, 15), at(10, 45), &booked_ten_to_eleven()));
}

#[test]
fn identical_interval_conflicts() {
    assert!(overlaps(at(10, 0), at(11, 0), &booked_ten_to_eleven()));
}

#[test]
fn adjacent_intervals_do_not_conflict() {
    assert!(!overlaps(at(9, 0), at(10, 0), &booked_ten_to_eleven()));
    assert!(!overlaps(at(11, 0), at(12, 0), &booked_ten_to_eleven()));
}

#[test]
fn nothing_booked_never_conflicts() {
    assert!(!overlaps(at(9, 0), at(17, 0), &[]));
}

#[test]
fn any_single_booking_is_enough() {
    let booked = vec![
        interval(2026, 3, 16, 8, 0, 9, 0),
        interval(2026, 3, 16, 13, 0, 14, 0),
    ];
    assert!(overlaps(at(13, 45), at(14, 15), &booked));
    assert!(!overlaps(at(9, 0), at(13, 0), &booked));
}

#[test]
fn overlap_is_symmetric() {
    let cases = [
        (interval(2026, 3, 16, 9, 0, 10, 0), interval(2026, 3, 16, 9, 30, 10, 30)),
        (interval(2026, 3, 16, 9, 0, 12, 0), interval(2026, 3, 16, 10, 0, 11, 0)),
        (interval(2026, 3, 16, 9, 0, 10, 0), interval(2026, 3, 16, 10, 0, 11, 0)),
        (interval(2026, 3, 16, 9, 0, 10, 0), interval(2026, 3, 16, 9, 0, 10, 0)),
    ];
    for (a, b) in cases {
        assert_eq!(a.overlaps(&b), b.overlaps(&a), "{a:?} vs {b:?}");
    }
}

#[test]
fn booking_without_duration_is_thirty_minutes() {
    let date = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
    let booked = BookedInterval::new(NaiveTime::from_hms_opt(10, 0, 0).unwrap(), None);
    assert_eq!(booked.anchor(date, 30), Interval::new(at(10, 0), at(10, 30)));
}

#[test]
fn zero_duration_booking_is_treated_as_missing() {
    let booked = BookedInterval::new(NaiveTime::from_hms_opt(10, 0, 0).unwrap(), Some(0));
    assert_eq!(booked.effective_duration(30), 30);
}

#[test]
fn anchor_all_keeps_order() {
    let date = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
    let booked = vec![
        BookedInterval::new(NaiveTime::from_hms_opt(14, 0, 0).unwrap(), Some(60)),
        BookedInterval::new(NaiveTime::from_hms_opt(9, 0, 0).unwrap(), Some(15)),
    ];
    let anchored = anchor_all(&booked, date, 30);
    assert_eq!(anchored[0], Interval::new(at(14, 0), at(15, 0)));
    assert_eq!(anchored[1], Interval::new(at(9, 0), at(9, 15)));
}

#[test]
fn booked_interval_reads_either_clock_style() {
    let a: BookedInterval = serde_json::from_str(r#"{"time":"10:30 AM","duration":45}"#).unwrap();
    let b: BookedInterval = serde_json::from_str(r#"{"time":"10:30"}"#).unwrap();
    assert_eq!(a.start, b.start);
    assert_eq!(a.duration_minutes, Some(45));
    assert_eq!(b.duration_minutes, None);
}

#[test]
fn booked_interval_rejects_bad_time() {
    let result: Result<BookedInterval, _> = serde_json::from_str(r#"{"time":"soonish"}"#);
    assert!(result.is_err());
}

#[test]
fn booked_interval_writes_label() {
    let booked = BookedInterval::new(NaiveTime::from_hms_opt(15, 5, 0).unwrap(), Some(20));
    let json = serde_json::to_string(&booked).unwrap();
    assert_eq!(json, r#"{"time":"3:05 PM","duration":20}"#);
}

// ── Pairwise conflict reporting ─────────────────────────────────────────────

#[test]
fn two_overlapping_intervals_detected() {
    let a = vec![interval(2026, 3, 1, 9, 0, 10, 0)];
    let b = vec![interval(2026, 3, 1, 9, 30, 10, 30)];

    let conflicts = find_conflicts(&a, &b);

    assert_eq!(conflicts.len(), 1, "should detect exactly one conflict");
    assert_eq!(conflicts[0].overlap_minutes, 30);
}

#[test]
fn fully_contained_interval_correct_overlap() {
    let a = vec![interval(2026, 3, 1, 9, 0, 12, 0)];
    let b = vec![interval(2026, 3, 1, 10, 0, 11, 0)];

    let conflicts = find_conflicts(&a, &b);

    assert_eq!(conflicts.len(), 1);
    assert_eq!(
        conflicts[0].overlap_minutes, 60,
        "overlap should be the duration of the smaller interval (60 min)"
    );
}

#[test]
fn multiple_conflicts_all_found() {
    let a = vec![
        interval(2026, 3, 1, 9, 0, 10, 0),
        interval(2026, 3, 1, 14, 0, 15, 0),
    ];
    let b = vec![
        interval(2026, 3, 1, 9, 30, 10, 30),
        interval(2026, 3, 1, 14, 30, 15, 30),
    ];

    let conflicts = find_conflicts(&a, &b);

    assert_eq!(conflicts.len(), 2, "should find both conflicts");
    assert_eq!(conflicts[0].interval_a, a[0]);
    assert_eq!(conflicts[1].interval_b, b[1]);
}

#[test]
fn adjacent_intervals_not_reported() {
    let a = vec![interval(2026, 3, 1, 9, 0, 10, 0)];
    let b = vec![interval(2026, 3, 1, 10, 0, 11, 0)];
    assert!(find_conflicts(&a, &b).is_empty());
}

#[test]
fn empty_lists_no_conflicts() {
    assert!(find_conflicts(&[], &[]).is_empty());
    assert!(find_conflicts(&[interval(2026, 3, 1, 9, 0, 10, 0)], &[]).is_empty());
}
