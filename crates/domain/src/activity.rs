use crate::{
    recurrence,
    shared::{
        entity::{Entity, ID},
        time::Time,
    },
};
use chrono::{DateTime, Utc};
use chrono_tz::{Tz, UTC};
use std::collections::HashSet;
use thiserror::Error;

pub const MIN_DURATION_MINUTES: i64 = 15;
pub const MAX_DURATION_MINUTES: i64 = 12 * 60;

/// A recurring weekly activity for a `Child`, e.g. football practice
/// every Monday and Wednesday at 17:00.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub id: ID,
    pub user_id: ID,
    pub child_id: ID,
    pub title: String,
    pub location: String,
    /// Days of the week the activity happens on, Sunday is `0`
    pub weekdays: Vec<u8>,
    pub start_time: Time,
    pub end_time: Time,
    /// The timezone `start_time` and `end_time` are given in
    pub timezone: Tz,
}

/// One concrete instance of an `Activity`
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    pub activity_id: ID,
    pub start: DateTime<Utc>,
}

#[derive(Error, Debug, PartialEq)]
pub enum ActivityValidationError {
    #[error("An activity needs at least one weekday")]
    NoWeekdays,
    #[error("Invalid weekday: {0}, expected a value from 0 to 6")]
    InvalidWeekday(u8),
    #[error("Weekday: {0} is given more than once")]
    DuplicateWeekday(u8),
    #[error("Start time: {0} must be before end time: {1}")]
    StartNotBeforeEnd(Time, Time),
    #[error("Duration of {0} minutes is not between 15 and 720 minutes")]
    InvalidDuration(i64),
}

impl Activity {
    pub fn new(
        user_id: &ID,
        child_id: &ID,
        title: &str,
        weekdays: Vec<u8>,
        start_time: Time,
        end_time: Time,
    ) -> Self {
        Self {
            id: Default::default(),
            user_id: user_id.clone(),
            child_id: child_id.clone(),
            title: title.to_string(),
            location: String::new(),
            weekdays,
            start_time,
            end_time,
            timezone: UTC,
        }
    }

    pub fn set_timezone(&mut self, timezone: &str) -> bool {
        match timezone.parse::<Tz>() {
            Ok(tzid) => {
                self.timezone = tzid;
                true
            }
            Err(_) => false,
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        self.end_time.minutes_since_midnight() - self.start_time.minutes_since_midnight()
    }

    pub fn validate(&self) -> Result<(), ActivityValidationError> {
        if self.weekdays.is_empty() {
            return Err(ActivityValidationError::NoWeekdays);
        }
        let mut seen = HashSet::new();
        for weekday in &self.weekdays {
            if *weekday > 6 {
                return Err(ActivityValidationError::InvalidWeekday(*weekday));
            }
            if !seen.insert(*weekday) {
                return Err(ActivityValidationError::DuplicateWeekday(*weekday));
            }
        }
        if self.start_time >= self.end_time {
            return Err(ActivityValidationError::StartNotBeforeEnd(
                self.start_time,
                self.end_time,
            ));
        }
        let duration = self.duration_minutes();
        if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&duration) {
            return Err(ActivityValidationError::InvalidDuration(duration));
        }
        Ok(())
    }

    /// All occurrences of this `Activity` within `[from, to]`, earliest first
    pub fn occurrences(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<Occurrence> {
        recurrence::expand(&self.weekdays, &self.start_time, from, to, &self.timezone)
            .into_iter()
            .map(|start| Occurrence {
                activity_id: self.id.clone(),
                start,
            })
            .collect()
    }
}

impl Entity for Activity {
    fn id(&self) -> &ID {
        &self.id
    }
}
