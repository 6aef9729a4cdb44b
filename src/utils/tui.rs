use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICKS: &[&str] = &["◐", "◓", "◑", "◒", "●"];

/// Spinner shown while waiting on Google. Drawn on stderr, so piped output
/// stays clean.
pub fn create_spinner(message: impl Into<String>) -> ProgressBar {
    let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICKS);

    let spinner = ProgressBar::new_spinner().with_style(style);
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Await `work` behind a spinner, clearing it once done.
pub async fn with_spinner<F: Future>(message: impl Into<String>, work: F) -> F::Output {
    let spinner = create_spinner(message);
    let output = work.await;
    spinner.finish_and_clear();
    output
}
