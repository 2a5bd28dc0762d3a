use std::cmp::{max, min};
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};

use crate::error::Error;

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    first: NaiveDate,
    last: NaiveDate,
}

impl Month {
    /// Month from a year and a 1-based month number
    pub fn new(year: i32, month: u32) -> Result<Self, Error> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self::starting)
            .ok_or_else(|| Error::validation(format!("invalid month {}-{}", year, month)))
    }

    /// The month a date falls in
    pub fn of(date: NaiveDate) -> Self {
        Self::starting(date - Days::new(u64::from(date.day0())))
    }

    fn starting(first: NaiveDate) -> Self {
        let length = days_in_month(first.year(), first.month());
        let last = first
            .checked_add_days(Days::new(u64::from(length - 1)))
            .unwrap_or(NaiveDate::MAX);
        Self { first, last }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// 1-based month number
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last
    }

    /// Number of days in the month
    pub fn days(&self) -> u32 {
        self.last.day()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }

    pub fn next(&self) -> Option<Month> {
        self.last.succ_opt().map(Month::of)
    }

    pub fn previous(&self) -> Option<Month> {
        self.first.pred_opt().map(Month::of)
    }

    /// Days of this month up to and including `today`
    ///
    /// Zero for a future month, the whole month for a past one.
    pub fn elapsed_days(&self, today: NaiveDate) -> u32 {
        if today < self.first {
            0
        } else if today > self.last {
            self.days()
        } else {
            today.day()
        }
    }

    /// Inclusive count of the days of `[start, end]` that fall inside this month
    pub fn overlap_days(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        let from = max(start, self.first);
        let to = min(end, self.last);
        if to < from {
            0
        } else {
            (to - from).num_days() as u32 + 1
        }
    }

    /// Iterate the days of `[start, end]` inside this month
    pub fn days_between(&self, start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
        let from = max(start, self.first);
        let to = min(end, self.last);
        from.iter_days().take_while(move |d| *d <= to)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for Month {
    type Err = Error;

    /// Parse `YYYY-MM`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| Error::validation(format!("expected YYYY-MM, got '{}'", s)))?;
        let year = year
            .parse()
            .map_err(|_| Error::validation(format!("invalid year in '{}'", s)))?;
        let month = month
            .parse()
            .map_err(|_| Error::validation(format!("invalid month in '{}'", s)))?;
        Month::new(year, month)
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
