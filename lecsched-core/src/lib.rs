//! Core types for lecsched.
//!
//! This crate provides the pieces shared by the HTTP server and calendar providers:
//! - `schedule` for the subject/session/recurrence payload
//! - `expand` for turning a schedule into concrete calendar events
//! - `reference` for the read-only subject and lecturer lookup tables
//! - `provider` for the calendar provider interface

pub mod error;
pub mod event;
pub mod expand;
pub mod normalize;
pub mod period;
pub mod provider;
pub mod reference;
pub mod schedule;
pub mod window;

pub use error::{ProviderError, ScheduleError, ScheduleResult};
pub use event::{CalendarEvent, EventDateTime, ReminderOverride, Reminders};
pub use expand::{ScheduleExpander, expand};
pub use period::{PeriodSpan, PeriodTable, SemesterAnchor};
pub use provider::{CalendarProvider, Credentials, TokenGrant, UserInfo};
pub use reference::{CatalogEntry, Lecturer, ReferenceData, SubjectName};
pub use schedule::{ClassSession, RecurrencePattern, SubjectSchedule};
pub use window::EventWindow;
