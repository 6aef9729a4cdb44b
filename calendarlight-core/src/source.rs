//! Where calendars and events come from.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CalendarLightResult;
use crate::event::{CalendarEvent, CalendarInfo};

#[async_trait]
pub trait CalendarSource {
    /// Calendars visible to the signed-in account.
    async fn list_calendars(&self) -> CalendarLightResult<Vec<CalendarInfo>>;

    /// The next events (at most `MAX_UPCOMING_EVENTS`) of a calendar that
    /// end after `now`, recurring events expanded, ordered by start time.
    async fn upcoming_events(
        &self,
        calendar_id: &str,
        now: DateTime<Utc>,
    ) -> CalendarLightResult<Vec<CalendarEvent>>;
}
