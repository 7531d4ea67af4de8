use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::date::CalendarDate;
use crate::error::{McetError, McetResult};

const DATE_KEY_LEN: usize = 10;

/// Canonical `YYYY-MM-DD` key for a calendar day.
///
/// Fixed width and zero padded, so comparing two keys as strings gives the
/// same answer as comparing the dates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey {
    key: String,
    date: CalendarDate,
}

impl DateKey {
    /// Decode a stored key. Anything but the exact fixed-width pattern naming
    /// a real date is `MalformedKey`.
    pub fn parse(key: &str) -> McetResult<Self> {
        Self::decode(key).map(DateKey::from)
    }

    pub fn decode(key: &str) -> McetResult<CalendarDate> {
        let malformed = || McetError::MalformedKey(key.to_string());

        let bytes = key.as_bytes();
        if bytes.len() != DATE_KEY_LEN || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(malformed());
        }
        let digits_ok = bytes
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 4 && *i != 7)
            .all(|(_, b)| b.is_ascii_digit());
        if !digits_ok {
            return Err(malformed());
        }

        let year = key[0..4].parse().map_err(|_| malformed())?;
        let month = key[5..7].parse().map_err(|_| malformed())?;
        let day = key[8..10].parse().map_err(|_| malformed())?;

        CalendarDate::new(year, month, day).map_err(|_| malformed())
    }

    pub fn date(&self) -> CalendarDate {
        self.date
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl From<CalendarDate> for DateKey {
    fn from(date: CalendarDate) -> Self {
        DateKey {
            key: format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day()),
            date,
        }
    }
}

impl From<&CalendarDate> for DateKey {
    fn from(date: &CalendarDate) -> Self {
        DateKey::from(*date)
    }
}

impl FromStr for DateKey {
    type Err = McetError;

    fn from_str(s: &str) -> McetResult<Self> {
        DateKey::parse(s)
    }
}

impl TryFrom<String> for DateKey {
    type Error = McetError;

    fn try_from(s: String) -> McetResult<Self> {
        DateKey::parse(&s)
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.key
    }
}

impl AsRef<str> for DateKey {
    fn as_ref(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}
