//! Terminal rendering for calendar types.
//!
//! Extension traits that add colored output to mcet-core types using
//! owo_colors.

use chrono::Local;
use mcet_core::grid::{DAYS_IN_WEEK, WEEKDAY_LABELS};
use mcet_core::{CalendarCell, CalendarDate, CellHighlight, Session, YearMonth};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for CalendarCell {
    fn render(&self) -> String {
        let Some(date) = self.date else {
            return "    ".to_string();
        };

        let label = format!(" {:>2} ", date.day());
        match self.highlight() {
            CellHighlight::Both => label.black().on_cyan().to_string(),
            CellHighlight::Attended => label.black().on_green().to_string(),
            CellHighlight::Event => label.black().on_yellow().to_string(),
            CellHighlight::None => label,
        }
    }
}

impl Render for Session {
    fn render(&self) -> String {
        format!("{} ({})", self.email().bold(), self.role())
    }
}

/// Month title, weekday header and grid rows.
pub fn render_month(month: YearMonth, cells: &[CalendarCell]) -> String {
    let mut lines = Vec::new();

    let width = DAYS_IN_WEEK * 4;
    lines.push(format!("{:^width$}", month.title()).bold().to_string());
    lines.push(
        WEEKDAY_LABELS
            .iter()
            .map(|d| format!("{:>3} ", d))
            .collect::<String>()
            .dimmed()
            .to_string(),
    );

    for row in cells.chunks(DAYS_IN_WEEK) {
        lines.push(row.iter().map(Render::render).collect());
    }

    lines.join("\n")
}

pub fn render_legend() -> String {
    format!(
        "{} attended  {} event  {} both",
        "  ".on_green(),
        "  ".on_yellow(),
        "  ".on_cyan()
    )
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Fri Mar 7")
pub fn format_date_label(date: CalendarDate) -> String {
    let today = Local::now().date_naive();

    match (date.naive() - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.naive().format("%a %b %-d %Y").to_string(),
    }
}

/// One day's events as an indented list.
pub fn render_day_events(date: CalendarDate, titles: &[String]) -> String {
    let mut lines = vec![format!("{} {}", format_date_label(date).bold(), date.dimmed())];
    lines.extend(titles.iter().map(|t| format!("  - {}", t)));
    lines.join("\n")
}
