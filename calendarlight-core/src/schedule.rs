//! Deciding what the light shows right now, and when to look again.

use std::time::Duration;

use busylight::Rgb;
use chrono::{DateTime, Timelike, Utc};

use crate::event::CalendarEvent;
use crate::light_config::{LightAction, LightConfig};
use crate::user_config::CalendarEntry;

/// How often calendars are re-fetched.
pub const CALENDAR_SYNC_PERIOD: Duration = Duration::from_secs(15 * 60);

/// Events fetched per calendar on each sync.
pub const MAX_UPCOMING_EVENTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightCommand {
    Off,
    On(Rgb),
}

impl LightCommand {
    pub fn color(&self) -> Rgb {
        match self {
            LightCommand::Off => Rgb::OFF,
            LightCommand::On(color) => *color,
        }
    }
}

/// The light config an event asks for: its own description, else its
/// calendar's default, else the global default. `None` when the description
/// is not a valid light config.
fn event_config(event: &CalendarEvent, calendars: &[CalendarEntry]) -> Option<LightConfig> {
    match LightConfig::from_description(event.description.as_deref()) {
        Ok(Some(config)) => Some(config),
        Ok(None) => Some(
            calendars
                .iter()
                .find(|c| c.id == event.calendar_id)
                .and_then(|c| c.light_config.clone())
                .unwrap_or_default(),
        ),
        Err(e) => {
            tracing::warn!("Skipping invalid event config for {}: {}", event, e);
            None
        }
    }
}

/// Pick the light state for `now`. When several events are running the last
/// one (in fetch order) with a valid config wins.
pub fn resolve(events: &[CalendarEvent], calendars: &[CalendarEntry], now: DateTime<Utc>) -> LightCommand {
    let mut active: Option<LightConfig> = None;

    for event in events.iter().filter(|e| e.is_active_at(now)) {
        tracing::debug!("Found active event: {}", event);
        if let Some(config) = event_config(event, calendars) {
            active = Some(config);
        }
    }

    match active {
        None => {
            tracing::debug!("No active event config found. Turning light off");
            LightCommand::Off
        }
        Some(config) => {
            tracing::debug!("Active event config: {}", config);
            match config.action {
                LightAction::On => LightCommand::On(config.rgb()),
                LightAction::Off => LightCommand::Off,
            }
        }
    }
}

/// One second past the next minute, and the whole seconds until then.
pub fn next_tick(now: DateTime<Utc>) -> (DateTime<Utc>, Duration) {
    let into_minute = chrono::Duration::seconds(i64::from(now.second()))
        + chrono::Duration::nanoseconds(i64::from(now.nanosecond()));
    let next = now - into_minute + chrono::Duration::seconds(61);

    let wait = (next - now).num_seconds().max(0) as u64;
    (next, Duration::from_secs(wait))
}
