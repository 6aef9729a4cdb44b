use anyhow::{Context, Result};
use calendarlight_core::{CalendarEntry, ConfigStore, LightAction, LightConfig};
use calendarlight_google::GoogleCalendar;
use dialoguer::Select;
use owo_colors::OwoColorize;

use crate::utils::tui;

/// Requested changes to a calendar's default light config.
#[derive(Debug, Default)]
pub struct LightChange {
    pub color: Option<String>,
    pub dim: Option<i64>,
    pub action: Option<LightAction>,
    pub clear: bool,
}

impl LightChange {
    /// Apply the change on top of `current` (or the defaults).
    fn apply(self, current: Option<&LightConfig>) -> Result<Option<LightConfig>> {
        if self.clear {
            return Ok(None);
        }

        let base = current.cloned().unwrap_or_default();
        let action = self.action.unwrap_or(base.action);
        let color = self.color.unwrap_or(base.color);
        let dim = self.dim.unwrap_or(i64::from(base.dim));

        Ok(Some(LightConfig::new(action, &color, dim)?))
    }
}

pub fn list() -> Result<()> {
    let store = ConfigStore::open()?;
    let calendars = store.calendars();

    if calendars.is_empty() {
        println!("{}", "No calendars configured".dimmed());
        println!("Add one with `calendarlight config add`.");
        return Ok(());
    }

    for (i, calendar) in calendars.iter().enumerate() {
        println!("[{}] {}", i, calendar);
        if let Some(light) = &calendar.light_config {
            println!("    {}", light.to_string().dimmed());
        }
    }

    Ok(())
}

pub async fn add() -> Result<()> {
    let mut store = ConfigStore::open()?;
    let google = GoogleCalendar::from_config_dir()?;

    let calendars = tui::with_spinner("Fetching your calendars", google.fetch_calendars())
        .await
        .context("Failed to fetch calendars")?;

    let available: Vec<_> = calendars
        .into_iter()
        .filter(|cal| !store.calendars().iter().any(|c| c.id == cal.id))
        .collect();

    if available.is_empty() {
        println!("{}", "All of your calendars are already configured".dimmed());
        return Ok(());
    }

    let items: Vec<String> = available.iter().map(|cal| cal.to_string()).collect();
    let Some(choice) = Select::new()
        .with_prompt("Calendar to add")
        .items(&items)
        .default(0)
        .interact_opt()?
    else {
        return Ok(());
    };

    let chosen = &available[choice];
    let entry = CalendarEntry::new(chosen.id.clone(), chosen.summary.clone());
    println!("{}", format!("Added: {}", entry).green());
    store.add_calendar(entry)?;

    Ok(())
}

pub fn remove() -> Result<()> {
    let mut store = ConfigStore::open()?;

    let Some(index) = pick_configured(&store, "Calendar to remove")? else {
        return Ok(());
    };

    let id = store.calendars()[index].id.clone();
    let removed = store.remove_calendar(&id)?;
    println!("{}", format!("Removed: {}", removed).red());

    Ok(())
}

pub fn edit(change: LightChange) -> Result<()> {
    let mut store = ConfigStore::open()?;

    let Some(index) = pick_configured(&store, "Calendar to edit")? else {
        return Ok(());
    };

    let mut entry = store.calendars()[index].clone();
    entry.light_config = change.apply(entry.light_config.as_ref())?;

    match &entry.light_config {
        Some(light) => println!("{}: {}", entry.summary, light.to_string().green()),
        None => println!("{}: {}", entry.summary, "light config cleared".dimmed()),
    }
    store.edit_calendar(entry)?;

    Ok(())
}

/// Prompt for one of the configured calendars. `None` when there are none or
/// the prompt was cancelled.
fn pick_configured(store: &ConfigStore, prompt: &str) -> Result<Option<usize>> {
    let calendars = store.calendars();
    if calendars.is_empty() {
        println!("{}", "No calendars configured".dimmed());
        return Ok(None);
    }

    let items: Vec<String> = calendars.iter().map(|cal| cal.to_string()).collect();
    let choice = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact_opt()?;

    Ok(choice)
}
