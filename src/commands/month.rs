use anyhow::Result;
use mcet_core::YearMonth;
use mcet_core::config::McetConfig;
use owo_colors::OwoColorize;

use super::load_view;
use crate::render::{render_day_events, render_legend, render_month};

pub async fn run(config: &McetConfig, month: YearMonth, student: Option<&str>, json: bool) -> Result<()> {
    let view = load_view(config, month, student).await?;
    let cells = view.render()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&cells)?);
        return Ok(());
    }

    if let Some(subject) = view.subject_email() {
        println!("{}", format!("Attendance for {}", subject).dimmed());
    }
    println!("{}", render_month(month, &cells));
    println!();
    println!("{}", render_legend());

    let events = view.month_events()?;
    if events.is_empty() {
        println!("\n{}", "No events this month".dimmed());
        return Ok(());
    }

    for (date, titles) in &events {
        println!();
        println!("{}", render_day_events(*date, titles));
    }

    Ok(())
}
