//! Period table and semester anchor.
//!
//! Both are built once at startup and handed to the expander; nothing here
//! is mutated afterwards.

use std::collections::BTreeMap;

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};

use crate::error::{ScheduleError, ScheduleResult};

/// Start/end time of day for one teaching period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodSpan {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Mapping from period number to its time-of-day span.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodTable {
    periods: BTreeMap<u32, PeriodSpan>,
}

impl PeriodTable {
    /// Build a table from `(period, "HH:MM", "HH:MM")` rows.
    pub fn from_rows(rows: &[(u32, &str, &str)]) -> ScheduleResult<Self> {
        let mut periods = BTreeMap::new();

        for (number, start, end) in rows {
            let span = PeriodSpan {
                start: parse_hm(start)?,
                end: parse_hm(end)?,
            };
            if span.end <= span.start {
                return Err(ScheduleError::Data(format!(
                    "period {} ends before it starts",
                    number
                )));
            }
            periods.insert(*number, span);
        }

        Ok(PeriodTable { periods })
    }

    pub fn get(&self, period: u32) -> ScheduleResult<PeriodSpan> {
        self.periods
            .get(&period)
            .copied()
            .ok_or_else(|| ScheduleError::Lookup(format!("unknown period {}", period)))
    }

    pub fn contains(&self, period: u32) -> bool {
        self.periods.contains_key(&period)
    }
}

impl Default for PeriodTable {
    /// Fifty-minute periods on the hour, starting at 07:00.
    fn default() -> Self {
        let periods = (1..=6u32)
            .map(|n| {
                let hour = 6 + n;
                let span = PeriodSpan {
                    start: NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default(),
                    end: NaiveTime::from_hms_opt(hour, 50, 0).unwrap_or_default(),
                };
                (n, span)
            })
            .collect();

        PeriodTable { periods }
    }
}

fn parse_hm(s: &str) -> ScheduleResult<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| ScheduleError::Data(format!("invalid time '{}', expected HH:MM", s)))
}

/// Calendar date of week 1, day 1 of the semester, plus the offset every
/// generated timestamp carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemesterAnchor {
    pub start: NaiveDate,
    pub offset: FixedOffset,
}

impl SemesterAnchor {
    /// Parse `YYYY-MM-DD` and an offset such as `+07:00`.
    pub fn parse(start: &str, offset: &str) -> ScheduleResult<Self> {
        let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").map_err(|_| {
            ScheduleError::Data(format!(
                "invalid semester start '{}', expected YYYY-MM-DD",
                start
            ))
        })?;
        let offset: FixedOffset = offset.parse().map_err(|_| {
            ScheduleError::Data(format!("invalid UTC offset '{}', expected ±HH:MM", offset))
        })?;

        Ok(SemesterAnchor { start, offset })
    }

    /// `start + (week - 1) weeks + (day_of_week - 1) days`.
    ///
    /// Both arguments are 1-based. Returns `None` if the date is out of range.
    pub fn date_for(&self, week: u32, day_of_week: u32) -> Option<NaiveDate> {
        let days = u64::from(week.saturating_sub(1)) * 7 + u64::from(day_of_week.saturating_sub(1));
        self.start.checked_add_days(Days::new(days))
    }

    /// Combine a date and time of day into a timestamp in the anchor's offset.
    ///
    /// Returns `None` when the UTC instant falls outside chrono's range.
    pub fn at(&self, date: NaiveDate, time: NaiveTime) -> Option<DateTime<FixedOffset>> {
        let utc = date.and_time(time).checked_sub_offset(self.offset)?;
        Some(DateTime::from_naive_utc_and_offset(utc, self.offset))
    }
}

impl Default for SemesterAnchor {
    /// Monday 2025-02-03, UTC.
    fn default() -> Self {
        SemesterAnchor {
            start: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap_or_default(),
            offset: Utc.fix(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Weekday};

    #[test]
    fn test_default_table_matches_timetable() {
        let table = PeriodTable::default();

        assert!((1..=6).all(|n| table.contains(n)));
        assert!(!table.contains(0));
        assert!(!table.contains(7));

        let first = table.get(1).unwrap();
        assert_eq!(first.start, NaiveTime::from_hms_opt(7, 0, 0).unwrap());
        assert_eq!(first.end, NaiveTime::from_hms_opt(7, 50, 0).unwrap());

        let sixth = table.get(6).unwrap();
        assert_eq!(sixth.start, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        assert_eq!(sixth.end, NaiveTime::from_hms_opt(12, 50, 0).unwrap());
    }

    #[test]
    fn test_unknown_period_is_lookup_error() {
        let err = PeriodTable::default().get(13).unwrap_err();
        assert!(err.is_lookup(), "got {:?}", err);
    }

    #[test]
    fn test_from_rows_rejects_inverted_span() {
        let err = PeriodTable::from_rows(&[(1, "08:00", "07:00")]).unwrap_err();
        assert!(matches!(err, ScheduleError::Data(_)));

        let table = PeriodTable::from_rows(&[(7, "13:00", "13:50")]).unwrap();
        assert!(table.contains(7));
        assert!(!table.contains(1));
    }

    #[test]
    fn test_anchor_date_for() {
        let anchor = SemesterAnchor::default();
        assert_eq!(anchor.start.weekday(), Weekday::Mon);

        assert_eq!(anchor.date_for(1, 3), NaiveDate::from_ymd_opt(2025, 2, 5));
        assert_eq!(anchor.date_for(2, 3), NaiveDate::from_ymd_opt(2025, 2, 12));
        assert_eq!(anchor.date_for(1, 7), NaiveDate::from_ymd_opt(2025, 2, 9));
        assert_eq!(anchor.date_for(u32::MAX, 1), None);
    }

    #[test]
    fn test_anchor_keeps_offset() {
        let anchor = SemesterAnchor::parse("2025-02-03", "+07:00").unwrap();
        let date = anchor.date_for(1, 1).unwrap();
        let dt = anchor.at(date, NaiveTime::from_hms_opt(7, 0, 0).unwrap()).unwrap();

        assert_eq!(dt.to_rfc3339(), "2025-02-03T07:00:00+07:00");
    }

    #[test]
    fn test_anchor_at_out_of_range() {
        // West of UTC the last representable day spills past chrono's maximum
        let anchor = SemesterAnchor::parse("2025-02-03", "-13:00").unwrap();
        let time = NaiveTime::from_hms_opt(12, 50, 0).unwrap();

        assert_eq!(anchor.at(NaiveDate::MAX, time), None);
        assert!(anchor.at(anchor.start, time).is_some());
    }

    #[test]
    fn test_anchor_parse_rejects_garbage() {
        assert!(SemesterAnchor::parse("03/02/2025", "+00:00").is_err());
        assert!(SemesterAnchor::parse("2025-02-03", "UTC+7").is_err());
    }
}
