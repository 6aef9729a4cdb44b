//! `CalendarSource` backed by the Google Calendar API.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use calendarlight_core::{
    CalendarEvent, CalendarInfo, CalendarLightError, CalendarLightResult, CalendarSource,
    MAX_UPCOMING_EVENTS, paths,
};
use chrono::{DateTime, Duration, Utc};
use google_calendar::Client;
use google_calendar::types::{MinAccessRole, OrderBy};

use crate::convert;
use crate::credentials::{self, Credentials};
use crate::session::Session;

/// How far ahead events are requested. Only the first
/// `MAX_UPCOMING_EVENTS` are kept.
const LOOKAHEAD_HOURS: i64 = 24;

pub struct GoogleCalendar {
    creds: Credentials,
    token_path: PathBuf,
}

impl GoogleCalendar {
    pub fn new(creds: Credentials, token_path: PathBuf) -> Self {
        GoogleCalendar { creds, token_path }
    }

    /// Use the credentials and session in the calendarlight config directory.
    pub fn from_config_dir() -> Result<Self> {
        let creds = credentials::load()?;
        Ok(Self::new(creds, paths::token_path()?))
    }

    async fn client(&self) -> Result<Client> {
        let session = Session::load_valid(&self.token_path, &self.creds).await?;
        Ok(session.client(&self.creds))
    }

    pub async fn fetch_calendars(&self) -> Result<Vec<CalendarInfo>> {
        let entries = self
            .client()
            .await?
            .calendar_list()
            .list_all(MinAccessRole::default(), false, false)
            .await
            .context("Failed to fetch calendars")?
            .body;

        Ok(entries.into_iter().filter_map(convert::calendar_info).collect())
    }

    pub async fn fetch_upcoming(&self, calendar_id: &str, now: DateTime<Utc>) -> Result<Vec<CalendarEvent>> {
        tracing::debug!(
            "Getting the upcoming {} events for {}",
            MAX_UPCOMING_EVENTS,
            calendar_id
        );

        let (time_min, time_max) = fetch_window(now);

        let events = self
            .client()
            .await?
            .events()
            .list_all(
                calendar_id,
                "",                 // i_cal_uid
                0,                  // max_attendees
                OrderBy::StartTime, // order_by
                &[],                // private_extended_property
                "",                 // q
                &[],                // shared_extended_property
                false,              // show_deleted
                false,              // show_hidden_invitations
                true,               // single_events: expand recurring events
                &time_max,          // time_max
                &time_min,          // time_min
                "",                 // time_zone
                "",                 // updated_min
            )
            .await
            .with_context(|| format!("Failed to fetch events for {calendar_id}"))?
            .body;

        Ok(events
            .into_iter()
            .filter_map(|e| convert::calendar_event(calendar_id, e))
            .take(MAX_UPCOMING_EVENTS)
            .collect())
    }
}

/// `time_min` and `time_max` for an events request made at `now`.
fn fetch_window(now: DateTime<Utc>) -> (String, String) {
    (
        now.to_rfc3339(),
        (now + Duration::hours(LOOKAHEAD_HOURS)).to_rfc3339(),
    )
}

/// Keep typed errors (e.g. not logged in) and flatten the rest.
fn into_core_error(err: anyhow::Error) -> CalendarLightError {
    match err.downcast::<CalendarLightError>() {
        Ok(inner) => inner,
        Err(other) => CalendarLightError::Calendar(format!("{other:#}")),
    }
}

#[async_trait]
impl CalendarSource for GoogleCalendar {
    async fn list_calendars(&self) -> CalendarLightResult<Vec<CalendarInfo>> {
        self.fetch_calendars().await.map_err(into_core_error)
    }

    async fn upcoming_events(
        &self,
        calendar_id: &str,
        now: DateTime<Utc>,
    ) -> CalendarLightResult<Vec<CalendarEvent>> {
        self.fetch_upcoming(calendar_id, now)
            .await
            .map_err(into_core_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_covers_the_next_day() {
        use chrono::TimeZone;

        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        let (time_min, time_max) = fetch_window(now);

        assert_eq!(time_min, "2026-10-19T08:30:00+00:00");
        assert_eq!(time_max, "2026-10-20T08:30:00+00:00");
    }

    #[test]
    fn typed_errors_survive_conversion() {
        let err = anyhow::Error::from(CalendarLightError::NotLoggedIn);
        assert!(matches!(into_core_error(err), CalendarLightError::NotLoggedIn));
    }

    #[test]
    fn other_errors_keep_their_context() {
        let err = anyhow::anyhow!("HTTP 500").context("Failed to fetch events for primary");
        match into_core_error(err) {
            CalendarLightError::Calendar(message) => {
                assert_eq!(message, "Failed to fetch events for primary: HTTP 500");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn not_logged_in_without_session() {
        let dir = tempfile::tempdir().unwrap();
        let calendar = GoogleCalendar::new(
            Credentials {
                client_id: "id".into(),
                client_secret: "secret".into(),
            },
            dir.path().join("token.toml"),
        );

        assert!(matches!(
            calendar.list_calendars().await,
            Err(CalendarLightError::NotLoggedIn)
        ));
    }
}
