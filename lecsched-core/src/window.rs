//! Time window for listing calendar events.

use chrono::{DateTime, Duration, Utc};

use crate::error::{ScheduleError, ScheduleResult};

/// Days before now covered when no lower bound is given.
pub const DEFAULT_PAST_DAYS: i64 = 30;
/// Days after now covered when no upper bound is given.
pub const DEFAULT_FUTURE_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl Default for EventWindow {
    /// `now - 30 days` .. `now + 7 days`
    fn default() -> Self {
        Self::around(Utc::now())
    }
}

impl EventWindow {
    pub fn around(now: DateTime<Utc>) -> Self {
        EventWindow {
            from: now - Duration::days(DEFAULT_PAST_DAYS),
            to: now + Duration::days(DEFAULT_FUTURE_DAYS),
        }
    }

    /// Parse optional RFC 3339 bounds; missing ones fall back to the default window.
    pub fn parse(from: Option<&str>, to: Option<&str>) -> ScheduleResult<Self> {
        Self::parse_at(Utc::now(), from, to)
    }

    fn parse_at(now: DateTime<Utc>, from: Option<&str>, to: Option<&str>) -> ScheduleResult<Self> {
        let defaults = Self::around(now);

        let from = match from.filter(|s| !s.trim().is_empty()) {
            Some(s) => parse_bound("timeMin", s)?,
            None => defaults.from,
        };
        let to = match to.filter(|s| !s.trim().is_empty()) {
            Some(s) => parse_bound("timeMax", s)?,
            None => defaults.to,
        };

        if to < from {
            return Err(ScheduleError::Validation(format!(
                "timeMax ({}) is before timeMin ({})",
                to.to_rfc3339(),
                from.to_rfc3339()
            )));
        }

        Ok(EventWindow { from, to })
    }
}

fn parse_bound(name: &str, s: &str) -> ScheduleResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            ScheduleError::Validation(format!(
                "Invalid {} '{}'. Expected an RFC 3339 timestamp",
                name, s
            ))
        })
}
