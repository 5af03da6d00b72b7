//! Tests for next-run computation.

use chrono::{Datelike, Duration, FixedOffset, TimeZone, Timelike, Utc, Weekday};
use ntclean::schedule::{Frequency, ScheduleTask, TaskDraft, next_run};
use ntclean::{CleanOptions, next_run as reexported};

fn task(hour: u32, minute: u32, frequency: Frequency, value: u32) -> ScheduleTask {
    TaskDraft {
        cron_hour: Some(hour),
        cron_minute: Some(minute),
        frequency: Some(frequency),
        frequency_value: Some(value),
        ..TaskDraft::default()
    }
    .into_task("t".into(), &CleanOptions::default())
}

#[test]
fn daily_just_after_trigger_rolls_to_tomorrow() {
    let now = Utc.with_ymd_and_hms(2025, 6, 2, 3, 0, 1).unwrap();
    let next = next_run(&task(3, 0, Frequency::Daily, 0), &now);
    assert_eq!(next, Utc.with_ymd_and_hms(2025, 6, 3, 3, 0, 0).unwrap());
}

#[test]
fn weekly_lands_on_the_coming_weekday() {
    // Monday 10:00, task on Wednesday (3).
    let now = Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap();
    assert_eq!(now.weekday(), Weekday::Mon);

    let next = next_run(&task(3, 0, Frequency::Weekly, 3), &now);
    assert_eq!(next, Utc.with_ymd_and_hms(2025, 6, 4, 3, 0, 0).unwrap());
    assert_eq!(next.weekday(), Weekday::Wed);
}

#[test]
fn weekly_sunday_is_zero() {
    let now = Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap();
    let next = next_run(&task(22, 30, Frequency::Weekly, 0), &now);
    assert_eq!(next, Utc.with_ymd_and_hms(2025, 6, 8, 22, 30, 0).unwrap());
}

#[test]
fn interval_counts_from_last_run() {
    let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
    let mut t = task(4, 15, Frequency::Interval, 5);
    t.last_run = Some(now - Duration::days(2));

    let next = next_run(&t, &now);
    assert_eq!(next, Utc.with_ymd_and_hms(2025, 6, 13, 4, 15, 0).unwrap());
}

#[test]
fn missed_interval_resets_to_next_daily_slot() {
    let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
    let mut t = task(4, 15, Frequency::Interval, 5);
    t.last_run = Some(now - Duration::days(9));

    let next = reexported(&t, &now);
    assert_eq!(next, Utc.with_ymd_and_hms(2025, 6, 11, 4, 15, 0).unwrap());
}

#[test]
fn computed_in_the_given_time_zone() {
    let tz = FixedOffset::east_opt(8 * 3600).unwrap();
    // 2025-06-02 02:00 at +08:00 is still 2025-06-01 in UTC.
    let now = tz.with_ymd_and_hms(2025, 6, 2, 2, 0, 0).unwrap();
    let next = next_run(&task(3, 0, Frequency::Daily, 0), &now);
    assert_eq!(next, tz.with_ymd_and_hms(2025, 6, 2, 3, 0, 0).unwrap());
    assert_eq!(next.with_timezone(&Utc).hour(), 19);
}

#[test]
fn next_run_is_always_in_the_future() {
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    for frequency in [Frequency::Daily, Frequency::Weekly, Frequency::Interval] {
        for step in 0..200 {
            let now = start + Duration::minutes(step * 97);
            let next = next_run(&task(3, 0, frequency, 2), &now);
            assert!(next > now, "{frequency} at {now}");
            assert!(next - now <= Duration::days(7));
        }
    }
}
