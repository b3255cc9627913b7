//! Month tokens and the calendar weeks used to filter a month's transactions.

use std::{fmt::Display, str::FromStr};

use time::{Date, Duration, Month, format_description::BorrowedFormatItem, macros::format_description};

/// The most windows a month is split into.
pub const MAX_WEEKS_PER_MONTH: usize = 5;

const WEEK_LABEL_FORMAT: &[BorrowedFormatItem] =
    format_description!("[day padding:zero] [month repr:short]");

const MONTH_LABEL_FORMAT: &[BorrowedFormatItem] = format_description!("[month repr:long] [year]");

/// A calendar month written as "YYYY-MM", e.g. "2025-02".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthToken {
    year: i32,
    month: Month,
}

impl MonthToken {
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// The month that `date` falls in.
    pub fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn first_day(&self) -> Date {
        // Day 1 exists in every month.
        Date::from_calendar_date(self.year, self.month, 1).unwrap_or(Date::MIN)
    }

    pub fn last_day(&self) -> Date {
        Date::from_calendar_date(
            self.year,
            self.month,
            last_day_of_month(self.year, self.month),
        )
        .unwrap_or(Date::MAX)
    }

    pub fn contains(&self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The human readable name of the month, e.g. "February 2025".
    pub fn label(&self) -> String {
        self.first_day()
            .format(MONTH_LABEL_FORMAT)
            .unwrap_or_else(|_| self.to_string())
    }
}

impl Display for MonthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, u8::from(self.month))
    }
}

/// The string is not a month in the form "YYYY-MM".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not a month in the form YYYY-MM")]
pub struct ParseMonthTokenError(String);

impl FromStr for MonthToken {
    type Err = ParseMonthTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParseMonthTokenError(s.to_owned());

        let (year, month) = s.split_once('-').ok_or_else(error)?;

        if year.len() != 4 || month.len() != 2 {
            return Err(error());
        }

        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(error());
        }

        let year: i32 = year.parse().map_err(|_| error())?;
        let month: u8 = month.parse().map_err(|_| error())?;
        let month = Month::try_from(month).map_err(|_| error())?;

        Ok(Self { year, month })
    }
}

/// A run of at most seven days inside one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekWindow {
    /// The position of the week within the month, starting at 1.
    pub number: u8,
    /// E.g. "Week 1 (01 Feb - 07 Feb)".
    pub label: String,
    pub start: Date,
    /// The last day of the week, inclusive.
    pub end: Date,
}

impl WeekWindow {
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Split `month` into consecutive windows of seven days starting on the 1st.
///
/// The last window is cut short at the end of the month and no more than
/// [MAX_WEEKS_PER_MONTH] windows are returned.
pub fn weeks_in_month(month: MonthToken) -> Vec<WeekWindow> {
    let last_day = month.last_day();
    let mut weeks = Vec::with_capacity(MAX_WEEKS_PER_MONTH);
    let mut week_start = month.first_day();

    while week_start <= last_day && weeks.len() < MAX_WEEKS_PER_MONTH {
        let week_end = (week_start + Duration::days(6)).min(last_day);
        let number = weeks.len() as u8 + 1;

        weeks.push(WeekWindow {
            number,
            label: week_label(number, week_start, week_end),
            start: week_start,
            end: week_end,
        });

        week_start += Duration::days(7);
    }

    weeks
}

fn week_label(number: u8, start: Date, end: Date) -> String {
    let format_day = |date: Date| {
        date.format(WEEK_LABEL_FORMAT)
            .unwrap_or_else(|_| date.to_string())
    };

    format!("Week {number} ({} - {})", format_day(start), format_day(end))
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
