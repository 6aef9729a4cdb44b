//! Error types for calendarlight.

use thiserror::Error;

/// Errors that can occur in calendarlight operations.
#[derive(Error, Debug)]
pub enum CalendarLightError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid light config: {0}")]
    InvalidLightConfig(String),

    #[error("Calendar '{0}' is already configured")]
    DuplicateCalendar(String),

    #[error("Calendar not found: {0}")]
    CalendarNotFound(String),

    #[error("Calendar error: {0}")]
    Calendar(String),

    #[error("Light error: {0}")]
    Light(#[from] busylight::BusylightError),

    #[error("Please log in with `calendarlight login`")]
    NotLoggedIn,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for calendarlight operations.
pub type CalendarLightResult<T> = Result<T, CalendarLightError>;
