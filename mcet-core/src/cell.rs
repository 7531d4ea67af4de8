//! Render state for one grid cell.

use serde::Serialize;

use crate::attendance::AttendanceMap;
use crate::date::{CalendarDate, YearMonth};
use crate::events::EventMap;
use crate::grid;
use crate::keys::DateKey;

/// How a cell should be highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellHighlight {
    None,
    Attended,
    Event,
    Both,
}

/// Derived from the grid and the two loaded record sets; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarCell {
    /// `None` for the blanks ahead of the 1st.
    pub date: Option<CalendarDate>,
    pub is_event_day: bool,
    pub is_attended_day: bool,
    pub event_titles: Vec<String>,
}

impl CalendarCell {
    pub fn blank() -> Self {
        CalendarCell {
            date: None,
            is_event_day: false,
            is_attended_day: false,
            event_titles: Vec::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.date.is_none()
    }

    pub fn highlight(&self) -> CellHighlight {
        match (self.is_attended_day, self.is_event_day) {
            (true, true) => CellHighlight::Both,
            (true, false) => CellHighlight::Attended,
            (false, true) => CellHighlight::Event,
            (false, false) => CellHighlight::None,
        }
    }
}

/// Lay `attendance` and `events` over the grid for `month`.
pub fn merge(month: YearMonth, attendance: &AttendanceMap, events: &EventMap) -> Vec<CalendarCell> {
    grid::month_cells(month)
        .into_iter()
        .map(|slot| match slot {
            None => CalendarCell::blank(),
            Some(date) => {
                let key = DateKey::from(date);
                let event_titles = events.get(&key).cloned().unwrap_or_default();
                CalendarCell {
                    date: Some(date),
                    is_event_day: !event_titles.is_empty(),
                    is_attended_day: attendance.get(&key).copied().unwrap_or(false),
                    event_titles,
                }
            }
        })
        .collect()
}
