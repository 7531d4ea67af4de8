//! Month grid generation.

use crate::date::{CalendarDate, YearMonth};
use crate::error::McetResult;

pub const DAYS_IN_WEEK: usize = 7;

/// Header row for the grid, Sunday first.
pub const WEEKDAY_LABELS: [&str; DAYS_IN_WEEK] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Number of days in `month` of `year`.
pub fn days_in_month(year: i32, month: u32) -> McetResult<u32> {
    Ok(YearMonth::new(year, month)?.days_in_month())
}

/// Weekday column of the 1st of the month (0 = Sunday .. 6 = Saturday).
pub fn leading_blanks(month: YearMonth) -> usize {
    month.first_day().weekday().num_days_from_sunday() as usize
}

/// Cells for one month: blanks until the 1st lines up with its weekday
/// column, then every day in order. The tail is never padded.
pub fn generate(year: i32, month: u32) -> McetResult<Vec<Option<CalendarDate>>> {
    Ok(month_cells(YearMonth::new(year, month)?))
}

pub fn month_cells(month: YearMonth) -> Vec<Option<CalendarDate>> {
    let blanks = leading_blanks(month);
    let first = month.first_day().naive();

    let days = first
        .iter_days()
        .take(month.days_in_month() as usize)
        .filter_map(|d| CalendarDate::try_from(d).ok())
        .map(Some);

    std::iter::repeat_n(None, blanks).chain(days).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::McetError;

    #[test]
    fn test_february_2025() {
        let cells = generate(2025, 2).unwrap();

        assert_eq!(cells.len(), 34);
        assert!(cells[..6].iter().all(Option::is_none));
        assert_eq!(cells[6], Some(CalendarDate::new(2025, 2, 1).unwrap()));
        assert_eq!(cells[33], Some(CalendarDate::new(2025, 2, 28).unwrap()));
    }

    #[test]
    fn test_month_starting_on_sunday_has_no_blanks() {
        // June 1st 2025 is a Sunday
        let cells = generate(2025, 6).unwrap();
        assert_eq!(cells.len(), 30);
        assert_eq!(cells[0], Some(CalendarDate::new(2025, 6, 1).unwrap()));
    }

    #[test]
    fn test_length_and_first_day_for_every_month() {
        for year in [1900, 2000, 2023, 2024, 2025, 2100] {
            for month in 1..=12 {
                let ym = YearMonth::new(year, month).unwrap();
                let cells = generate(year, month).unwrap();
                let blanks = leading_blanks(ym);

                assert_eq!(cells.len(), blanks + ym.days_in_month() as usize);
                let first = cells.iter().flatten().next().unwrap();
                assert_eq!(first.day(), 1);
                assert_eq!(cells.iter().position(Option::is_some), Some(blanks));
            }
        }
    }

    #[test]
    fn test_leap_february() {
        let cells = generate(2024, 2).unwrap();
        let last = cells.last().copied().flatten().unwrap();
        assert_eq!(last, CalendarDate::new(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_invalid_month_is_rejected() {
        assert!(matches!(generate(2025, 0), Err(McetError::InvalidArgument(_))));
        assert!(matches!(generate(2025, 13), Err(McetError::InvalidArgument(_))));
    }
}
