//! Calendar dates and month addressing.
//!
//! `CalendarDate` wraps a `chrono::NaiveDate` so it can never hold an
//! impossible day (Feb 30 and friends). Years are limited to four digits so
//! that `DateKey` strings sort the same way the dates do.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{McetError, McetResult};

pub const MIN_YEAR: i32 = 0;
pub const MAX_YEAR: i32 = 9999;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn check_year(year: i32) -> McetResult<()> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(McetError::InvalidArgument(format!(
            "year {} is outside {}..={}",
            year, MIN_YEAR, MAX_YEAR
        )))
    }
}

fn check_month(month: u32) -> McetResult<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(McetError::InvalidArgument(format!(
            "month {} is outside 1..=12",
            month
        )))
    }
}

/// A valid Gregorian date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "NaiveDate", into = "NaiveDate")]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn new(year: i32, month: u32, day: u32) -> McetResult<Self> {
        check_year(year)?;
        check_month(month)?;
        NaiveDate::from_ymd_opt(year, month, day)
            .map(CalendarDate)
            .ok_or_else(|| {
                McetError::InvalidArgument(format!(
                    "{:04}-{:02}-{:02} is not a calendar date",
                    year, month, day
                ))
            })
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    pub fn year_month(&self) -> YearMonth {
        YearMonth {
            year: self.year(),
            month: self.month(),
        }
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    /// Today in the local timezone.
    pub fn today() -> McetResult<Self> {
        Self::try_from(chrono::Local::now().date_naive())
    }
}

impl TryFrom<NaiveDate> for CalendarDate {
    type Error = McetError;

    fn try_from(date: NaiveDate) -> McetResult<Self> {
        check_year(date.year())?;
        Ok(CalendarDate(date))
    }
}

impl From<CalendarDate> for NaiveDate {
    fn from(date: CalendarDate) -> Self {
        date.0
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// A month of a specific year; the unit a calendar view loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> McetResult<Self> {
        check_year(year)?;
        check_month(month)?;
        Ok(YearMonth { year, month })
    }

    pub fn current() -> McetResult<Self> {
        Ok(CalendarDate::today()?.year_month())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> CalendarDate {
        // Both fields were validated at construction, day 1 always exists.
        CalendarDate(NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default())
    }

    pub fn days_in_month(&self) -> u32 {
        match self.month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            _ if is_leap_year(self.year) => 29,
            _ => 28,
        }
    }

    /// The following month, rolling December over into January.
    pub fn next(&self) -> McetResult<Self> {
        if self.month == 12 {
            YearMonth::new(self.year + 1, 1)
        } else {
            YearMonth::new(self.year, self.month + 1)
        }
    }

    /// The preceding month, rolling January back into December.
    pub fn previous(&self) -> McetResult<Self> {
        if self.month == 1 {
            YearMonth::new(self.year - 1, 12)
        } else {
            YearMonth::new(self.year, self.month - 1)
        }
    }

    pub fn contains(&self, date: &CalendarDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Title shown above the grid, e.g. "March 2025".
    pub fn title(&self) -> String {
        format!("{} {}", MONTH_NAMES[(self.month - 1) as usize], self.year)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
