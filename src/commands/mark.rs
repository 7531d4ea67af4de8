use anyhow::Result;
use mcet_core::CalendarDate;
use mcet_core::config::McetConfig;
use owo_colors::OwoColorize;

use super::load_view;

pub async fn run(config: &McetConfig, student: &str, date: CalendarDate) -> Result<()> {
    let mut view = load_view(config, date.year_month(), None).await?;

    view.mark_attendance(student, date).await?;
    println!("{} {} present on {}", "✓".green(), student.bold(), date);

    Ok(())
}
