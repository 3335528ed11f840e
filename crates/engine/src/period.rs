//! Calendar month buckets used to scope budgets and reports.

use chrono::{Datelike, NaiveDate};

use crate::{EngineError, ResultEngine};

/// One calendar month, covering the dates `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthPeriod {
    year: i32,
    month: u32,
    start: NaiveDate,
    end: NaiveDate,
}

impl MonthPeriod {
    pub fn new(year: i32, month: u32) -> ResultEngine<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::Validation(
                "Month must be between 1 and 12".to_string(),
            ));
        }
        let (next_year, next_month) = if month == 12 {
            (year.checked_add(1), 1)
        } else {
            (Some(year), month + 1)
        };
        let start = NaiveDate::from_ymd_opt(year, month, 1);
        let end = next_year.and_then(|y| NaiveDate::from_ymd_opt(y, next_month, 1));
        match (start, end) {
            (Some(start), Some(end)) => Ok(Self {
                year,
                month,
                start,
                end,
            }),
            _ => Err(EngineError::Validation(format!("Year {year} is out of range"))),
        }
    }

    /// The month `date` falls in.
    pub fn containing(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let end = start
            .checked_add_months(chrono::Months::new(1))
            .unwrap_or(NaiveDate::MAX);
        Self {
            year: date.year(),
            month: date.month(),
            start,
            end,
        }
    }

    /// The twelve months of `year`, January first.
    pub fn months_of(year: i32) -> ResultEngine<Vec<Self>> {
        (1..=12).map(|month| Self::new(year, month)).collect()
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month (inclusive).
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// First day of the following month (exclusive).
    pub fn end(&self) -> NaiveDate {
        self.end
    }
}
