//! Wall-clock expiry schedules
//!
//! Content is republished on a timetable, so cached responses expire at fixed
//! clock boundaries (every half hour by default) as well as after their TTL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CacheError;

/// Clock boundaries at which every cached entry expires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExpirySchedule {
    /// Entries live for their TTL only
    None,
    /// Expire at :00 and :30 past every hour (UTC)
    #[default]
    HalfHourly,
    /// Expire at :00 past every hour (UTC)
    Hourly,
}

impl ExpirySchedule {
    fn period_secs(self) -> Option<i64> {
        match self {
            ExpirySchedule::None => None,
            ExpirySchedule::HalfHourly => Some(30 * 60),
            ExpirySchedule::Hourly => Some(60 * 60),
        }
    }

    /// First boundary strictly after `now`
    ///
    /// Boundaries are aligned to the Unix epoch, which in UTC coincides with
    /// the top of the hour.
    pub fn next_boundary(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let period = self.period_secs()?;
        let next = (now.timestamp().div_euclid(period) + 1) * period;
        DateTime::from_timestamp(next, 0)
    }

    /// Expiry for an entry inserted at `now` with the given TTL
    pub fn expiry(self, now: DateTime<Utc>, ttl: chrono::Duration) -> DateTime<Utc> {
        let by_ttl = now + ttl;
        match self.next_boundary(now) {
            Some(boundary) if boundary < by_ttl => boundary,
            _ => by_ttl,
        }
    }
}

impl std::str::FromStr for ExpirySchedule {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "none" | "off" => Ok(ExpirySchedule::None),
            "half_hourly" | "halfhourly" => Ok(ExpirySchedule::HalfHourly),
            "hourly" => Ok(ExpirySchedule::Hourly),
            _ => Err(CacheError::UnknownSchedule(s.to_string())),
        }
    }
}
