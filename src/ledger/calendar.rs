use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn of(instant: DateTime<Utc>) -> Self {
        Self {
            year: instant.year(),
            month: instant.month(),
        }
    }

    pub fn next(self) -> Self {
        self.shift(1)
    }

    pub fn shift(self, months: i32) -> Self {
        let index = self.year * 12 + self.month as i32 - 1 + months;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// Midnight UTC on `day` of this month, or `None` when the day does not exist.
    pub fn day(self, day: u32) -> Option<DateTime<Utc>> {
        NaiveDate::from_ymd_opt(self.year, self.month, day).map(start_of_day)
    }

    pub fn first_instant(self) -> DateTime<Utc> {
        first_of(self)
    }

    pub fn end_exclusive(self) -> DateTime<Utc> {
        first_of(self.next())
    }

    pub fn contains(self, instant: DateTime<Utc>) -> bool {
        Self::of(instant) == self
    }

    pub fn days_in_month(self) -> u32 {
        let last = self.end_exclusive() - Duration::days(1);
        last.day()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (year, month) = raw
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("expected YYYY-MM, got `{raw}`"))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("invalid year in `{raw}`"))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("invalid month in `{raw}`"))?;
        MonthKey::new(year, month).ok_or_else(|| format!("month out of range in `{raw}`"))
    }
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

pub fn end_of_day_exclusive(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date) + Duration::days(1)
}

fn first_of(key: MonthKey) -> DateTime<Utc> {
    // Day 1 exists in every month.
    Utc.with_ymd_and_hms(key.year, key.month, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
