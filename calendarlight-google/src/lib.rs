//! Google Calendar access for calendarlight.
//!
//! The OAuth client and session are kept in the calendarlight config
//! directory:
//!   ~/.calendarlight/credentials.json
//!   ~/.calendarlight/token.toml

pub mod auth;
pub mod calendar;
pub mod convert;
pub mod credentials;
pub mod session;

pub use calendar::GoogleCalendar;
pub use credentials::Credentials;
