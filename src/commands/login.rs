use anyhow::Result;
use calendarlight_core::paths;
use calendarlight_google::{auth, credentials};
use owo_colors::OwoColorize;

pub async fn run() -> Result<()> {
    let creds = credentials::load()?;
    let token_path = paths::token_path()?;

    println!("Signing in to Google Calendar...");
    auth::login(&creds, &token_path).await?;

    println!("{}", "Logged in.".green());
    println!("Next, pick a calendar with `calendarlight config add`.");

    Ok(())
}
