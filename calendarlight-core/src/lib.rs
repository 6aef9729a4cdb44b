//! Core of calendarlight: which calendars to watch, how events map to light
//! states, and the loop that keeps the lights in sync.
//!
//! Calendar access lives behind the `CalendarSource` trait and light output
//! behind `LightSink`, so everything here runs without Google or hardware.

pub mod error;
pub mod event;
pub mod light_config;
pub mod paths;
pub mod runner;
pub mod schedule;
pub mod source;
pub mod user_config;

pub use error::{CalendarLightError, CalendarLightResult};
pub use event::{CalendarEvent, CalendarInfo};
pub use light_config::{LightAction, LightConfig};
pub use runner::{LightSink, Runner};
pub use schedule::{LightCommand, MAX_UPCOMING_EVENTS};
pub use source::CalendarSource;
pub use user_config::{CalendarEntry, ConfigStore, UserConfig};
