//! Concrete calendar events produced by the expander.
//!
//! The serialized form is shaped for direct submission to a calendar
//! creation API: `{summary, description, location, start: {dateTime},
//! end: {dateTime}, reminders: {useDefault, overrides}}`.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Minutes before start for the popup reminder attached to every event.
pub const REMINDER_MINUTES: i64 = 10;

/// One concrete class meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub summary: String,
    pub description: String,
    pub location: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub reminders: Reminders,
}

/// Absolute timestamp with explicit offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDateTime {
    #[serde(
        rename = "dateTime",
        serialize_with = "serialize_rfc3339",
        deserialize_with = "deserialize_rfc3339"
    )]
    pub date_time: DateTime<FixedOffset>,
}

impl From<DateTime<FixedOffset>> for EventDateTime {
    fn from(date_time: DateTime<FixedOffset>) -> Self {
        EventDateTime { date_time }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderOverride {
    pub method: String,
    pub minutes: i64,
}

impl Reminders {
    /// A single popup `minutes` before start, with the calendar's defaults disabled.
    pub fn single_popup(minutes: i64) -> Self {
        Reminders {
            use_default: false,
            overrides: vec![ReminderOverride {
                method: "popup".to_string(),
                minutes,
            }],
        }
    }
}

impl Default for Reminders {
    fn default() -> Self {
        Self::single_popup(REMINDER_MINUTES)
    }
}

fn serialize_rfc3339<S: Serializer>(dt: &DateTime<FixedOffset>, s: S) -> Result<S::Ok, S::Error> {
    // Always `+00:00`, never `Z`, so the offset is explicit
    s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Secs, false))
}

fn deserialize_rfc3339<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<FixedOffset>, D::Error> {
    let s = String::deserialize(d)?;
    DateTime::parse_from_rfc3339(&s).map_err(serde::de::Error::custom)
}
