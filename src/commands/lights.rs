use anyhow::Result;
use busylight::LightManager;
use owo_colors::OwoColorize;

pub fn run() -> Result<()> {
    let manager = LightManager::discover()?;

    if manager.is_empty() {
        println!("{}", "No lights found".dimmed());
        return Ok(());
    }

    for light in manager.describe() {
        println!(
            "[{}] {} {}",
            light.index,
            light.name,
            format!("({:04x}:{:04x})", light.vendor_id, light.product_id).dimmed()
        );
    }

    Ok(())
}
