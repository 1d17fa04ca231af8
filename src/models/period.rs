use chrono::{Datelike, Local, Months, NaiveDate, NaiveDateTime};
use std::str::FromStr;

use crate::errors::ValidationError;

/// One calendar month, with its inclusive window precomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    year: i32,
    month: u32,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::Month(month));
        }
        // Four-digit years keep stored timestamps lexicographically ordered.
        if !(1..=9999).contains(&year) {
            return Err(ValidationError::Year(year));
        }
        let first =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or(ValidationError::Year(year))?;
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt())
            .ok_or(ValidationError::Year(year))?;
        let start = first
            .and_hms_opt(0, 0, 0)
            .ok_or(ValidationError::Year(year))?;
        let end = last
            .and_hms_opt(23, 59, 59)
            .ok_or(ValidationError::Year(year))?;
        Ok(Self {
            year,
            month,
            start,
            end,
        })
    }

    /// The month containing today, in local time.
    pub fn current() -> Result<Self, ValidationError> {
        let today = Local::now().date_naive();
        Self::new(today.year(), today.month())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First instant of the month.
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// 23:59:59 on the last day of the month.
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn contains(&self, ts: &NaiveDateTime) -> bool {
        *ts >= self.start && *ts <= self.end
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ValidationError::Period(s.to_string());
        let (y, m) = s.trim().split_once('-').ok_or_else(bad)?;
        if y.len() != 4 || m.is_empty() || m.len() > 2 {
            return Err(bad());
        }
        let year: i32 = y.parse().map_err(|_| bad())?;
        let month: u32 = m.parse().map_err(|_| bad())?;
        Self::new(year, month)
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
