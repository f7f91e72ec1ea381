//! Schedule expansion.
//!
//! Turns a subject's weekly recurrence description (weekday + active weeks +
//! period numbers) into one concrete calendar event per listed week.
//!
//! Expansion runs in two passes. The first validates every session and
//! pattern and resolves rooms and time spans into a plan; the second walks
//! the plan and emits events. A malformed pattern anywhere in the payload
//! therefore fails the whole call before a single event exists.

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::error::{ScheduleError, ScheduleResult};
use crate::event::{CalendarEvent, Reminders};
use crate::period::{PeriodSpan, PeriodTable, SemesterAnchor};
use crate::schedule::{RecurrencePattern, SubjectSchedule};

/// Expands schedules against a fixed period table and semester anchor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleExpander {
    periods: PeriodTable,
    anchor: SemesterAnchor,
}

/// A validated pattern with every occurrence already resolved.
struct PlannedPattern {
    session: usize,
    location: Option<String>,
    occurrences: Vec<(DateTime<FixedOffset>, DateTime<FixedOffset>)>,
}

/// Expand with the default period table and semester anchor.
pub fn expand(subject: &SubjectSchedule) -> ScheduleResult<Vec<CalendarEvent>> {
    ScheduleExpander::default().expand(subject)
}

impl ScheduleExpander {
    pub fn new(periods: PeriodTable, anchor: SemesterAnchor) -> Self {
        ScheduleExpander { periods, anchor }
    }

    pub fn anchor(&self) -> &SemesterAnchor {
        &self.anchor
    }

    /// Expand a subject into events ordered by session, then pattern, then ascending week.
    pub fn expand(&self, subject: &SubjectSchedule) -> ScheduleResult<Vec<CalendarEvent>> {
        let plan = self.plan(subject)?;

        let title = subject.title();
        let sessions = subject.sessions();

        let mut events = Vec::with_capacity(plan.iter().map(|p| p.occurrences.len()).sum());

        for pattern in &plan {
            let description = sessions[pattern.session].description();

            for &(start, end) in &pattern.occurrences {
                events.push(CalendarEvent {
                    summary: title.clone(),
                    description: description.clone(),
                    location: pattern.location.clone(),
                    start: start.into(),
                    end: end.into(),
                    reminders: Reminders::default(),
                });
            }
        }

        debug!(
            subject = %title,
            patterns = plan.len(),
            events = events.len(),
            "Expanded schedule"
        );

        Ok(events)
    }

    /// Validation pass. Checks everything generation relies on.
    fn plan(&self, subject: &SubjectSchedule) -> ScheduleResult<Vec<PlannedPattern>> {
        if subject
            .subject_code
            .as_deref()
            .is_none_or(|code| code.trim().is_empty())
        {
            return Err(ScheduleError::missing_field("maMonHoc"));
        }

        let sessions = subject
            .sessions
            .as_ref()
            .ok_or_else(|| ScheduleError::missing_field("lichHoc"))?;

        let mut plan = Vec::new();

        for (s, session) in sessions.iter().enumerate() {
            let patterns = session
                .class_info
                .as_ref()
                .ok_or_else(|| ScheduleError::missing_field(&format!("lichHoc[{}].classInfo", s)))?;

            // Rooms carry forward within a session only
            let mut room: Option<String> = None;

            for (p, pattern) in patterns.iter().enumerate() {
                let path = format!("lichHoc[{}].classInfo[{}]", s, p);

                if let Some(current) = pattern.room.as_deref().map(str::trim)
                    && !current.is_empty()
                {
                    room = Some(current.to_string());
                }

                plan.push(self.plan_pattern(pattern, &path, s, room.clone())?);
            }
        }

        Ok(plan)
    }

    fn plan_pattern(
        &self,
        pattern: &RecurrencePattern,
        path: &str,
        session: usize,
        location: Option<String>,
    ) -> ScheduleResult<PlannedPattern> {
        let day = pattern
            .day_of_week
            .ok_or_else(|| ScheduleError::missing_field(&format!("{}.dayOfWeek", path)))?;
        if !(1..=7).contains(&day) {
            return Err(ScheduleError::Validation(format!(
                "{}.dayOfWeek must be between 1 and 7, got {}",
                path, day
            )));
        }
        let day_of_week = day as u32;

        let weeks = positive_set(pattern.weeks.as_deref(), &format!("{}.week", path))?;
        let periods = positive_set(pattern.periods.as_deref(), &format!("{}.tietHoc", path))?;

        for &period in &periods {
            if !self.periods.contains(period) {
                return Err(ScheduleError::Lookup(format!(
                    "{}.tietHoc references unknown period {}",
                    path, period
                )));
            }
        }

        // One block from min to max period, gaps included
        let (Some(&first), Some(&last)) = (periods.first(), periods.last()) else {
            return Err(ScheduleError::missing_field(&format!("{}.tietHoc", path)));
        };
        let span = PeriodSpan {
            start: self.periods.get(first)?.start,
            end: self.periods.get(last)?.end,
        };

        let occurrences = weeks
            .iter()
            .map(|&week| {
                self.occurrence(week, day_of_week, span).ok_or_else(|| {
                    ScheduleError::Validation(format!(
                        "{}.week {} is outside the supported calendar range",
                        path, week
                    ))
                })
            })
            .collect::<ScheduleResult<Vec<_>>>()?;

        Ok(PlannedPattern {
            session,
            location,
            occurrences,
        })
    }

    fn occurrence(
        &self,
        week: u32,
        day_of_week: u32,
        span: PeriodSpan,
    ) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        let date = self.anchor.date_for(week, day_of_week)?;
        Some((self.anchor.at(date, span.start)?, self.anchor.at(date, span.end)?))
    }
}

/// Collect a required, non-empty list of positive integers into a sorted set.
fn positive_set(values: Option<&[i64]>, path: &str) -> ScheduleResult<BTreeSet<u32>> {
    let values = values.ok_or_else(|| ScheduleError::missing_field(path))?;

    if values.is_empty() {
        return Err(ScheduleError::Validation(format!("{} must not be empty", path)));
    }

    values
        .iter()
        .map(|&v| {
            u32::try_from(v)
                .ok()
                .filter(|&v| v > 0)
                .ok_or_else(|| {
                    ScheduleError::Validation(format!(
                        "{} must contain positive integers, got {}",
                        path, v
                    ))
                })
        })
        .collect()
}
