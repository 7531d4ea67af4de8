use anyhow::Result;
use mcet_core::CalendarDate;
use mcet_core::config::McetConfig;
use owo_colors::OwoColorize;

use super::load_view;
use crate::render::render_day_events;

pub async fn run(config: &McetConfig, date: CalendarDate, title: &str) -> Result<()> {
    let mut view = load_view(config, date.year_month(), None).await?;

    let titles = view.add_event(date, title).await?;
    println!("{} Event added", "✓".green());
    println!("{}", render_day_events(date, &titles));

    Ok(())
}
