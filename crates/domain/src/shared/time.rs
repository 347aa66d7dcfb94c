use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// A wall-clock time of day in 24 hour format, e.g. `09:30`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Time {
    pub hours: u32,
    pub minutes: u32,
}

impl Time {
    pub fn new(hours: u32, minutes: u32) -> Result<Self, InvalidTimeError> {
        if hours > 23 || minutes > 59 {
            return Err(InvalidTimeError::OutOfRange(format!(
                "{:02}:{:02}",
                hours, minutes
            )));
        }
        Ok(Self { hours, minutes })
    }

    pub fn minutes_since_midnight(&self) -> i64 {
        (self.hours * 60 + self.minutes) as i64
    }

    pub fn as_naive_time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hours, self.minutes, 0)
    }
}

impl std::cmp::PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::cmp::Ord for Time {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.minutes_since_midnight()
            .cmp(&other.minutes_since_midnight())
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidTimeError {
    #[error("Malformed time: {0}, expected HH:MM")]
    Malformed(String),
    #[error("Time out of range: {0}")]
    OutOfRange(String),
}

impl FromStr for Time {
    type Err = InvalidTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || InvalidTimeError::Malformed(s.to_string());
        let (hours, minutes) = s.split_once(':').ok_or_else(malformed)?;
        if hours.len() != 2 || minutes.len() != 2 {
            return Err(malformed());
        }
        let hours = hours.parse::<u32>().map_err(|_| malformed())?;
        let minutes = minutes.parse::<u32>().map_err(|_| malformed())?;
        Self::new(hours, minutes)
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}

impl Serialize for Time {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse::<Time>().map_err(serde::de::Error::custom)
    }
}
