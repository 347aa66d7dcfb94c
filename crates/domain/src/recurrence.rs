use crate::shared::time::Time;
use chrono::{prelude::*, Duration, LocalResult};
use chrono_tz::Tz;

pub const DAYS_IN_WEEK: i64 = 7;

/// Expands a weekly recurrence into every occurrence within `[from, to]`.
///
/// `weekdays` are indices where Sunday is `0` and Saturday is `6`. The
/// `start_time` is a wall-clock time in `tz`, so an occurrence keeps its local
/// time of day across daylight saving transitions.
///
/// The returned instants are deduplicated and sorted ascending. Unknown
/// weekday indices are ignored and an empty weekday set yields no occurrences.
pub fn expand(
    weekdays: &[u8],
    start_time: &Time,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    tz: &Tz,
) -> Vec<DateTime<Utc>> {
    let mut occurrences = Vec::new();
    if weekdays.is_empty() || from > to {
        return occurrences;
    }

    let mut window_start = from;
    while window_start <= to {
        for weekday in weekdays {
            if let Some(occurrence) = next_on_weekday(*weekday, start_time, window_start, tz) {
                if occurrence >= from && occurrence <= to {
                    occurrences.push(occurrence);
                }
            }
        }
        window_start += Duration::days(DAYS_IN_WEEK);
    }

    occurrences.sort();
    occurrences.dedup();
    occurrences
}

/// The first instant at or after `window_start` that falls on `weekday` at
/// `time` in the given timezone.
fn next_on_weekday(
    weekday: u8,
    time: &Time,
    window_start: DateTime<Utc>,
    tz: &Tz,
) -> Option<DateTime<Utc>> {
    if weekday > 6 {
        return None;
    }
    let time = time.as_naive_time()?;
    let local_start = window_start.with_timezone(tz);
    let current_weekday = local_start.weekday().num_days_from_sunday() as i64;
    let days_ahead = (weekday as i64 - current_weekday).rem_euclid(DAYS_IN_WEEK);

    let date = local_start.date_naive() + Duration::days(days_ahead);
    let candidate = localize(tz, date.and_time(time))?;
    if candidate >= window_start {
        return Some(candidate);
    }

    // Same weekday but the time of day has already passed
    let date = date + Duration::days(DAYS_IN_WEEK);
    localize(tz, date.and_time(time))
}

/// Resolves a wall-clock time in `tz` to an absolute instant.
///
/// Ambiguous local times (clocks turned back) resolve to the earliest instant.
/// Local times that do not exist (clocks turned forward) are moved forward by
/// one hour.
pub fn localize(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => tz
            .from_local_datetime(&(local + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}
