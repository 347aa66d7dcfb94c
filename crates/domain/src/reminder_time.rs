use chrono::{DateTime, Duration, Utc};

/// Length of the rolling window in which reminders are materialized
pub const ACTIONABLE_WINDOW_HOURS: i64 = 24;

/// The instant `offset_minutes` before the given occurrence
pub fn reminder_instant(occurrence: DateTime<Utc>, offset_minutes: i64) -> DateTime<Utc> {
    occurrence - Duration::minutes(offset_minutes)
}

/// Whether `instant` falls in `[now, now + 24h]`, both ends inclusive
pub fn is_actionable(instant: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    instant >= now && instant <= now + Duration::hours(ACTIONABLE_WINDOW_HOURS)
}
