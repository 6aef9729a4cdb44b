use anyhow::{Context, Result};
use busylight::LightManager;
use calendarlight_core::{ConfigStore, Runner};
use calendarlight_google::GoogleCalendar;

pub async fn run(light_indices: &[usize]) -> Result<()> {
    let store = ConfigStore::open()?;
    let calendars = store.calendars().to_vec();
    if calendars.is_empty() {
        println!("No calendars configured. Add one with `calendarlight config add`.");
    }

    let google = GoogleCalendar::from_config_dir()?;

    let mut lights = LightManager::discover().context("Failed to scan for lights")?;
    if lights.is_empty() {
        anyhow::bail!("No lights found. Plug in a supported light and try again.");
    }
    lights.select(light_indices)?;

    for light in lights.describe().iter().filter(|l| l.selected) {
        tracing::info!("Using light [{}] {}", light.index, light.name);
    }

    let mut runner = Runner::new(calendars, google, lights);
    runner.run(shutdown_signal()).await?;

    Ok(())
}

/// Completes on Ctrl-C, or SIGTERM (as sent by launchctl) on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
