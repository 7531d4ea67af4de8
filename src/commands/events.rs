use anyhow::Result;
use mcet_core::CalendarDate;
use mcet_core::config::McetConfig;
use mcet_core::events::EventRepository;
use owo_colors::OwoColorize;

use crate::open_store;
use crate::render::render_day_events;

pub async fn run(config: &McetConfig, date: Option<CalendarDate>) -> Result<()> {
    let repo = EventRepository::new(open_store(config));

    let days: Vec<(CalendarDate, Vec<String>)> = match date {
        Some(date) => vec![(date, repo.load_date(date).await?)],
        None => repo
            .load_all()
            .await?
            .into_iter()
            .map(|(key, titles)| (key.date(), titles))
            .collect(),
    };

    let days: Vec<_> = days.into_iter().filter(|(_, t)| !t.is_empty()).collect();
    if days.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    for (i, (date, titles)) in days.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", render_day_events(*date, titles));
    }

    Ok(())
}
