//! Next-run computation. Pure: the caller supplies "now" and its time zone.

use super::task::{Recurrence, ScheduleTask};
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeDelta, TimeZone};

/// The next instant strictly after `now` at which `task` should fire.
///
/// Starts from today at the trigger time, rolling to tomorrow if that is not
/// in the future. Weekly tasks then roll forward to their weekday. Interval
/// tasks use `lastRun + N days` when that is still ahead; a missed interval
/// falls back to the next daily slot.
#[must_use]
pub fn next_run<Tz: TimeZone>(task: &ScheduleTask, now: &DateTime<Tz>) -> DateTime<Tz> {
    let tz = now.timezone();
    let time = task.trigger_time();

    let mut date = now.date_naive();
    if at(&tz, date, time) <= *now {
        date = next_day(date);
    }

    match task.recurrence() {
        Recurrence::Daily => {}
        Recurrence::Weekly { days_from_sunday } => {
            for _ in 0..7 {
                if date.weekday().num_days_from_sunday() == days_from_sunday {
                    break;
                }
                date = next_day(date);
            }
        }
        Recurrence::Interval { days } => {
            if let Some(last) = task.last_run {
                let last_date = last.with_timezone(&tz).date_naive();
                if let Some(due) = last_date.checked_add_days(Days::new(u64::from(days))) {
                    let candidate = at(&tz, due, time);
                    if candidate > *now {
                        return candidate;
                    }
                }
            }
        }
    }

    at(&tz, date, time)
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.succ_opt().unwrap_or(date)
}

/// Wall-clock `date time` in `tz`. Ambiguous times take the earlier
/// instant; times skipped by a DST jump move an hour later.
fn at<Tz: TimeZone>(tz: &Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Tz> {
    let local = date.and_time(time);
    tz.from_local_datetime(&local)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(local + TimeDelta::hours(1)))
                .earliest()
        })
        .unwrap_or_else(|| tz.from_utc_datetime(&local))
}
