use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use mcet_core::YearMonth;

/// Spinner shown on stderr while a month's records are fetched.
pub fn month_spinner(month: YearMonth) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["-", "\\", "|", "/", ""])
        .template("{spinner} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Loading {}", month.title()));
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
