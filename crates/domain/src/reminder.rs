use crate::{
    activity::Activity,
    child::Child,
    notification::ScheduledNotification,
    reminder_time::{is_actionable, reminder_instant},
    user::User,
};
use chrono::{DateTime, Duration, Utc};

/// How far ahead occurrences are expanded when reminders are synced
pub const OCCURRENCE_LOOKAHEAD_DAYS: i64 = 7;

/// Computes the `ScheduledNotification`s that should exist for an `Activity`
/// right now.
///
/// Occurrences are expanded over the next week, but only those starting
/// within the actionable window get reminders. A reminder is only created
/// for the kinds enabled in the `User`s settings and only if it would fire
/// strictly after `now`.
pub fn plan_notifications(
    activity: &Activity,
    user: &User,
    child: &Child,
    now: DateTime<Utc>,
) -> Vec<ScheduledNotification> {
    let kinds = user.notification_settings.enabled_kinds();
    if kinds.is_empty() {
        return Vec::new();
    }

    let horizon = now + Duration::days(OCCURRENCE_LOOKAHEAD_DAYS);
    let mut notifications = Vec::new();
    for occurrence in activity
        .occurrences(now, horizon)
        .into_iter()
        .filter(|o| is_actionable(o.start, now))
    {
        for kind in &kinds {
            let remind_at = reminder_instant(occurrence.start, kind.offset_minutes());
            if remind_at <= now {
                continue;
            }
            notifications.push(ScheduledNotification::new(
                activity,
                child,
                occurrence.start,
                *kind,
                remind_at,
                now,
            ));
        }
    }

    notifications
}
