//! Where calendarlight keeps its files.
//!
//!   ~/.calendarlight/config.yaml       calendars to watch
//!   ~/.calendarlight/credentials.json  Google OAuth client (user-provided)
//!   ~/.calendarlight/token.toml        Google OAuth session
//!
//! `CALENDARLIGHT_DIR` overrides the directory.

use std::path::PathBuf;

use crate::error::{CalendarLightError, CalendarLightResult};

pub const DIR_ENV: &str = "CALENDARLIGHT_DIR";

pub fn config_dir() -> CalendarLightResult<PathBuf> {
    if let Some(dir) = std::env::var_os(DIR_ENV).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    Ok(dirs::home_dir()
        .ok_or_else(|| CalendarLightError::Config("Could not determine home directory".into()))?
        .join(".calendarlight"))
}

pub fn user_config_path() -> CalendarLightResult<PathBuf> {
    Ok(config_dir()?.join("config.yaml"))
}

pub fn credentials_path() -> CalendarLightResult<PathBuf> {
    Ok(config_dir()?.join("credentials.json"))
}

pub fn token_path() -> CalendarLightResult<PathBuf> {
    Ok(config_dir()?.join("token.toml"))
}
