//! The calendars calendarlight watches, stored in `config.yaml`.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CalendarLightError, CalendarLightResult};
use crate::light_config::LightConfig;
use crate::paths;

/// A watched calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub id: String,
    pub summary: String,

    /// Used for this calendar's events when their description is blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light_config: Option<LightConfig>,
}

impl CalendarEntry {
    pub fn new(id: impl Into<String>, summary: impl Into<String>) -> Self {
        CalendarEntry {
            id: id.into(),
            summary: summary.into(),
            light_config: None,
        }
    }
}

impl fmt::Display for CalendarEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.summary, self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub calendars: Vec<CalendarEntry>,
}

/// Loads `config.yaml` and writes every change straight back to it.
pub struct ConfigStore {
    path: PathBuf,
    config: UserConfig,
}

impl ConfigStore {
    /// Open the store in the default config directory.
    pub fn open() -> CalendarLightResult<Self> {
        Self::open_at(&paths::config_dir()?)
    }

    /// Open (creating if needed) `config.yaml` inside `dir`.
    pub fn open_at(dir: &Path) -> CalendarLightResult<Self> {
        std::fs::create_dir_all(dir)?;

        let path = dir.join("config.yaml");
        if !path.exists() {
            std::fs::write(&path, "")?;
        }

        let contents = std::fs::read_to_string(&path)?;
        let config = if contents.trim().is_empty() {
            UserConfig::default()
        } else {
            serde_yaml::from_str::<Option<UserConfig>>(&contents)
                .map_err(|e| {
                    CalendarLightError::Config(format!("Failed to parse {}: {}", path.display(), e))
                })?
                .unwrap_or_default()
        };

        tracing::debug!(
            "Loaded {} calendar(s) from {}",
            config.calendars.len(),
            path.display()
        );

        Ok(ConfigStore { path, config })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn calendars(&self) -> &[CalendarEntry] {
        &self.config.calendars
    }

    pub fn add_calendar(&mut self, calendar: CalendarEntry) -> CalendarLightResult<()> {
        if self.config.calendars.iter().any(|c| c.id == calendar.id) {
            return Err(CalendarLightError::DuplicateCalendar(calendar.id));
        }

        tracing::info!("Adding calendar {}", calendar);
        let mut next = self.config.clone();
        next.calendars.push(calendar);
        self.commit(next)
    }

    /// Replace the calendar with the same id.
    pub fn edit_calendar(&mut self, calendar: CalendarEntry) -> CalendarLightResult<()> {
        let mut next = self.config.clone();
        let existing = next
            .calendars
            .iter_mut()
            .find(|c| c.id == calendar.id)
            .ok_or_else(|| CalendarLightError::CalendarNotFound(calendar.id.clone()))?;

        tracing::info!("Updating calendar {}", calendar);
        *existing = calendar;
        self.commit(next)
    }

    pub fn remove_calendar(&mut self, calendar_id: &str) -> CalendarLightResult<CalendarEntry> {
        let index = self
            .config
            .calendars
            .iter()
            .position(|c| c.id == calendar_id)
            .ok_or_else(|| CalendarLightError::CalendarNotFound(calendar_id.to_string()))?;

        let mut next = self.config.clone();
        let removed = next.calendars.remove(index);
        self.commit(next)?;
        tracing::info!("Removed calendar {}", removed);
        Ok(removed)
    }

    pub fn flush(&self) -> CalendarLightResult<()> {
        write_config(&self.path, &self.config)
    }

    /// Write `next` to disk, and only then make it current.
    fn commit(&mut self, next: UserConfig) -> CalendarLightResult<()> {
        write_config(&self.path, &next)?;
        self.config = next;
        Ok(())
    }
}

fn write_config(path: &Path, config: &UserConfig) -> CalendarLightResult<()> {
    let contents = serde_yaml::to_string(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}
