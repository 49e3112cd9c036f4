use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Month, Months, NaiveDate};

use crate::error::RunError;

pub trait DateBoundaries {
    fn end_of_month(&self) -> Option<Self>
    where
        Self: Sized;

    fn end_of_week(&self) -> Option<Self>
    where
        Self: Sized;
}

impl DateBoundaries for NaiveDate {
    fn end_of_month(&self) -> Option<Self> {
        self.checked_add_months(Months::new(1))
            .and_then(|d| d.with_day(1))
            .and_then(|d| d.checked_sub_days(Days::new(1)))
    }

    fn end_of_week(&self) -> Option<Self> {
        let max_days = 6;
        let num_days = max_days - self.weekday().num_days_from_monday();
        self.checked_add_days(Days::new(num_days.into()))
    }
}

/// Render a date as "October 5", without zero padding on the day.
pub fn format_day(date: NaiveDate) -> String {
    date.format("%B %-d").to_string()
}

/// Parse a month name as written in a timesheet, e.g. "October" or "oct".
pub fn parse_month(name: &str) -> Result<Month, RunError> {
    Month::from_str(name.trim()).map_err(|_| RunError::Month {
        name: name.to_string(),
    })
}

/// The days of one Monday to Sunday week that fall inside a single month.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct WeekRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn num_days(&self) -> u32 {
        self.end.day() - self.start.day() + 1
    }

    /// Days of the month covered by the range, as timesheet column keys.
    pub fn days(&self) -> impl Iterator<Item = u32> {
        self.start.day()..=self.end.day()
    }

    pub fn label(&self) -> String {
        format!("{} - {}", format_day(self.start), format_day(self.end))
    }
}

impl fmt::Display for WeekRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Split a month into its calendar weeks, earliest first, with the first
/// and last week clipped to the month.
pub fn month_weeks(year: i32, month: Month) -> Result<Vec<WeekRange>, RunError> {
    let invalid = || RunError::Year { year };
    let first = NaiveDate::from_ymd_opt(year, month.number_from_month(), 1)
        .ok_or_else(invalid)?;
    let last = first.end_of_month().ok_or_else(invalid)?;

    let mut weeks = Vec::new();
    let mut start = first;
    while start <= last {
        let end = start.end_of_week().map_or(last, |d| d.min(last));
        weeks.push(WeekRange::new(start, end));
        match end.succ_opt() {
            Some(next) => start = next,
            None => break,
        }
    }
    Ok(weeks)
}
