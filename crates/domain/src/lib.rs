mod activity;
mod child;
mod notification;
pub mod recurrence;
mod reminder;
pub mod reminder_time;
mod shared;
mod user;

pub use activity::{
    Activity, ActivityValidationError, Occurrence, MAX_DURATION_MINUTES, MIN_DURATION_MINUTES,
};
pub use child::Child;
pub use notification::{
    InvalidNotificationKindError, NotificationKind, NotificationSettings, ScheduledNotification,
};
pub use reminder::{plan_notifications, OCCURRENCE_LOOKAHEAD_DAYS};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use shared::time::{InvalidTimeError, Time};
pub use user::User;
