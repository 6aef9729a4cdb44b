//! Google API types to calendarlight types.

use calendarlight_core::{CalendarEvent, CalendarInfo};
use google_calendar::types::{CalendarListEntry, Event};

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}

/// `None` for deleted or id-less entries.
pub fn calendar_info(entry: CalendarListEntry) -> Option<CalendarInfo> {
    if entry.deleted || entry.id.is_empty() {
        return None;
    }

    let summary = if !entry.summary_override.is_empty() {
        entry.summary_override
    } else if !entry.summary.is_empty() {
        entry.summary
    } else {
        "(unnamed)".to_string()
    };

    Some(CalendarInfo {
        id: entry.id,
        summary,
        time_zone: non_empty(entry.time_zone),
        primary: entry.primary,
    })
}

/// `None` for cancelled or id-less events.
pub fn calendar_event(calendar_id: &str, event: Event) -> Option<CalendarEvent> {
    if event.status == "cancelled" || event.id.is_empty() {
        return None;
    }

    Some(CalendarEvent {
        id: event.id,
        calendar_id: calendar_id.to_string(),
        summary: non_empty(event.summary),
        description: non_empty(event.description),
        start: event.start.and_then(|s| s.date_time),
        end: event.end.and_then(|e| e.date_time),
    })
}
