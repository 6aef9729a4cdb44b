//! Provider-neutral calendars and events.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A calendar the account can see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarInfo {
    pub id: String,
    pub summary: String,
    pub time_zone: Option<String>,
    pub primary: bool,
}

impl fmt::Display for CalendarInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.summary, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    /// The configured calendar this event was fetched from.
    pub calendar_id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    /// Start and end instants. All-day events have neither.
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl CalendarEvent {
    /// Whether `now` falls strictly inside the event.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start < now && now < end,
            _ => false,
        }
    }
}

impl fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary.as_deref().unwrap_or("(no title)");
        match (self.start, self.end) {
            (Some(start), Some(end)) => write!(
                f,
                "{} [{} - {}]",
                summary,
                start.format("%Y-%m-%d %H:%M"),
                end.format("%H:%M")
            ),
            _ => write!(f, "{} [all day]", summary),
        }
    }
}
