//! Background service as a macOS launchd agent.
//!
//! The agent runs `calendarlight run` at login and restarts it if it exits.
//! Output goes to `~/Library/Logs/calendarlight/{out,err}.log`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use tokio::process::Command;

const SERVICE_NAME: &str = "com.calendarlight.agent";

struct ServicePaths {
    plist: PathBuf,
    log_dir: PathBuf,
}

fn service_paths() -> Result<ServicePaths> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(ServicePaths {
        plist: home
            .join("Library")
            .join("LaunchAgents")
            .join(format!("{SERVICE_NAME}.plist")),
        log_dir: home.join("Library").join("Logs").join("calendarlight"),
    })
}

fn ensure_macos() -> Result<()> {
    if !cfg!(target_os = "macos") {
        anyhow::bail!("The background service is only supported on macOS");
    }
    Ok(())
}

/// Escape text for inclusion in plist XML.
fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render_plist(executable: &Path, log_dir: &Path) -> String {
    let executable = xml_escape(&executable.display().to_string());
    let out_log = xml_escape(&log_dir.join("out.log").display().to_string());
    let err_log = xml_escape(&log_dir.join("err.log").display().to_string());

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>{SERVICE_NAME}</string>
    <key>ProgramArguments</key>
    <array>
        <string>{executable}</string>
        <string>run</string>
    </array>
    <key>RunAtLoad</key>
    <true/>
    <key>KeepAlive</key>
    <true/>
    <key>StandardOutPath</key>
    <string>{out_log}</string>
    <key>StandardErrorPath</key>
    <string>{err_log}</string>
</dict>
</plist>
"#
    )
}

fn find_executable() -> Result<PathBuf> {
    match which::which("calendarlight") {
        Ok(path) => Ok(path),
        Err(_) => std::env::current_exe().context("Could not locate the calendarlight executable"),
    }
}

pub fn install() -> Result<()> {
    ensure_macos()?;
    let paths = service_paths()?;
    let executable = find_executable()?;

    std::fs::create_dir_all(&paths.log_dir)
        .with_context(|| format!("Failed to create {}", paths.log_dir.display()))?;
    if let Some(parent) = paths.plist.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    std::fs::write(&paths.plist, render_plist(&executable, &paths.log_dir))
        .with_context(|| format!("Failed to write {}", paths.plist.display()))?;

    println!("{}", format!("Installed {}", paths.plist.display()).green());
    println!("Start it with `calendarlight service start`.");
    Ok(())
}

pub async fn start() -> Result<()> {
    launchctl("load").await?;
    println!("{}", "Service started".green());
    Ok(())
}

pub async fn stop() -> Result<()> {
    launchctl("unload").await?;
    println!("{}", "Service stopped".dimmed());
    Ok(())
}

async fn launchctl(subcommand: &str) -> Result<()> {
    ensure_macos()?;
    let paths = service_paths()?;

    if !paths.plist.exists() {
        anyhow::bail!("Service is not installed. Run `calendarlight service install` first.");
    }

    tracing::debug!("launchctl {} {}", subcommand, paths.plist.display());
    let status = Command::new("launchctl")
        .arg(subcommand)
        .arg(&paths.plist)
        .status()
        .await
        .context("Failed to run launchctl")?;

    if !status.success() {
        anyhow::bail!("launchctl {} exited with {}", subcommand, status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plist_runs_calendarlight() {
        let plist = render_plist(
            Path::new("/usr/local/bin/calendarlight"),
            Path::new("/Users/me/Library/Logs/calendarlight"),
        );

        assert!(plist.contains("<string>com.calendarlight.agent</string>"));
        assert!(plist.contains("<string>/usr/local/bin/calendarlight</string>\n        <string>run</string>"));
        assert!(plist.contains("<string>/Users/me/Library/Logs/calendarlight/out.log</string>"));
        assert!(plist.contains("<string>/Users/me/Library/Logs/calendarlight/err.log</string>"));
    }

    #[test]
    fn plist_escapes_paths() {
        let plist = render_plist(Path::new("/opt/a&b/calendarlight"), Path::new("/tmp/logs"));
        assert!(plist.contains("/opt/a&amp;b/calendarlight"));
    }
}
