use chrono::Utc;
use lecsched_core::CalendarEvent;
use lecsched_core::event::EventDateTime;

pub trait ToGoogle {
    fn to_google(&self) -> google_calendar::types::Event;
}

impl ToGoogle for CalendarEvent {
    fn to_google(&self) -> google_calendar::types::Event {
        let reminders = Some(google_calendar::types::Reminders {
            overrides: self
                .reminders
                .overrides
                .iter()
                .map(|r| google_calendar::types::EventReminder {
                    method: r.method.clone(),
                    minutes: r.minutes,
                })
                .collect(),
            use_default: self.reminders.use_default,
        });

        google_calendar::types::Event {
            summary: self.summary.clone(),
            description: self.description.clone(),
            location: self.location.clone().unwrap_or_default(),
            start: Some(date_time_to_google(&self.start)),
            end: Some(date_time_to_google(&self.end)),
            reminders,
            ..Default::default()
        }
    }
}

fn date_time_to_google(time: &EventDateTime) -> google_calendar::types::EventDateTime {
    google_calendar::types::EventDateTime {
        date: None,
        date_time: Some(time.date_time.with_timezone(&Utc)),
        time_zone: String::new(),
    }
}
