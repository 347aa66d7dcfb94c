use crate::{
    activity::Activity,
    child::Child,
    shared::entity::{Entity, ID},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// How long before an occurrence a reminder fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationKind {
    OneHour,
    ThirtyMinutes,
}

impl NotificationKind {
    pub fn offset_minutes(&self) -> i64 {
        match self {
            Self::OneHour => 60,
            Self::ThirtyMinutes => 30,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneHour => "oneHour",
            Self::ThirtyMinutes => "thirtyMinutes",
        }
    }
}

impl Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("Unknown notification kind: {0}")]
pub struct InvalidNotificationKindError(String);

impl FromStr for NotificationKind {
    type Err = InvalidNotificationKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "oneHour" => Ok(Self::OneHour),
            "thirtyMinutes" => Ok(Self::ThirtyMinutes),
            _ => Err(InvalidNotificationKindError(s.to_string())),
        }
    }
}

/// Which reminder kinds a `User` wants to receive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub one_hour: bool,
    pub thirty_minutes: bool,
}

impl NotificationSettings {
    pub fn enabled_kinds(&self) -> Vec<NotificationKind> {
        let mut kinds = Vec::with_capacity(2);
        if self.one_hour {
            kinds.push(NotificationKind::OneHour);
        }
        if self.thirty_minutes {
            kinds.push(NotificationKind::ThirtyMinutes);
        }
        kinds
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            one_hour: true,
            thirty_minutes: true,
        }
    }
}

/// A reminder about an upcoming `Activity` occurrence that should be
/// delivered to the owning `User` at `scheduled_for`.
///
/// The activity title, child name, location and start are copied onto the
/// record when it is created so that it can be delivered without looking up
/// the `Activity` or `Child` again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledNotification {
    pub id: ID,
    pub user_id: ID,
    pub activity_id: ID,
    pub child_id: ID,
    pub scheduled_for: DateTime<Utc>,
    pub kind: NotificationKind,
    pub activity_title: String,
    pub child_name: String,
    pub activity_start: DateTime<Utc>,
    pub location: String,
    /// Set by the dispatcher once delivered. Sent records are never
    /// deleted or changed by reminder reconciliation.
    pub sent: bool,
    pub created: DateTime<Utc>,
}

impl ScheduledNotification {
    pub fn new(
        activity: &Activity,
        child: &Child,
        activity_start: DateTime<Utc>,
        kind: NotificationKind,
        scheduled_for: DateTime<Utc>,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Default::default(),
            user_id: activity.user_id.clone(),
            activity_id: activity.id.clone(),
            child_id: child.id.clone(),
            scheduled_for,
            kind,
            activity_title: activity.title.clone(),
            child_name: child.name.clone(),
            activity_start,
            location: activity.location.clone(),
            sent: false,
            created,
        }
    }

    /// Whether two records describe the same reminder, ignoring identity
    /// and creation time.
    pub fn same_reminder(&self, other: &Self) -> bool {
        self.activity_id == other.activity_id
            && self.activity_start == other.activity_start
            && self.kind == other.kind
            && self.scheduled_for == other.scheduled_for
            && self.activity_title == other.activity_title
            && self.child_name == other.child_name
            && self.location == other.location
            && self.sent == other.sent
    }
}

impl Entity for ScheduledNotification {
    fn id(&self) -> &ID {
        &self.id
    }
}
