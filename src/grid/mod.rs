mod cells;
pub use self::cells::{Cell, Cells};
use self::cells::WeekdayExt;
use crate::model::ChronicleDate;
use std::iter::successors;
use thiserror::Error;
use time::{util::is_leap_year, Month, Weekday};

pub const DAYS_IN_WEEK: usize = 7;

/// Layout of a single month as rows of weeks, Sunday first.
///
/// Row `week`, column `day` (both zero-based) is a "populated" cell if it
/// falls on a real day of the month; the cells before day 1 and after the
/// last day are blank.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CalendarGrid {
    year: i32,
    month: Month,
    days_in_month: u8,
    // Weekday indices, 0 = Sunday
    start_weekday: u8,
    end_weekday: u8,
}

impl CalendarGrid {
    /// Construct the grid for a month given by number (1 through 12)
    pub fn new(month: u8, year: i32) -> Result<CalendarGrid, InvalidCalendarInput> {
        let month = Month::try_from(month).map_err(|_| InvalidCalendarInput::Month(month))?;
        CalendarGrid::for_month(year, month)
    }

    pub fn for_month(year: i32, month: Month) -> Result<CalendarGrid, InvalidCalendarInput> {
        let first = ChronicleDate::from_calendar_date(year, month, 1)
            .map_err(|_| InvalidCalendarInput::Year(year))?;
        Ok(CalendarGrid::containing(first))
    }

    /// Returns the grid for the month that `date` falls in
    pub fn containing(date: ChronicleDate) -> CalendarGrid {
        let days_in_month = month_length(date.year(), date.month());
        let start = date.weekday().nth_prev((date.day() - 1) % 7);
        let end = start.nth_next((days_in_month - 1) % 7);
        CalendarGrid {
            year: date.year(),
            month: date.month(),
            days_in_month,
            start_weekday: start.index0(),
            end_weekday: end.index0(),
        }
    }

    /// The twelve months of `year`, starting with January
    pub fn months_of(year: i32) -> Result<Vec<CalendarGrid>, InvalidCalendarInput> {
        let january = CalendarGrid::for_month(year, Month::January)?;
        Ok(successors(Some(january), CalendarGrid::next_month)
            .take(12)
            .collect())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn days_in_month(&self) -> u8 {
        self.days_in_month
    }

    /// Index of the weekday of day 1, where 0 is Sunday
    pub fn start_weekday(&self) -> u8 {
        self.start_weekday
    }

    /// Index of the weekday of the last day of the month, where 0 is Sunday
    pub fn end_weekday(&self) -> u8 {
        self.end_weekday
    }

    /// Number of week rows needed so that every day lands under its weekday
    pub fn row_count(&self) -> usize {
        (usize::from(self.days_in_month) + usize::from(self.start_weekday)).div_ceil(DAYS_IN_WEEK)
    }

    /// Number of seven-day columns in the column-major layout, which ignores
    /// weekdays and simply stacks the days of the month in groups of seven
    pub fn column_count(&self) -> usize {
        usize::from(self.days_in_month).div_ceil(DAYS_IN_WEEK)
    }

    pub fn is_populated_cell(&self, week: usize, day: usize) -> bool {
        self.day_index(week, day).is_some()
    }

    /// Returns the date shown in row `week`, column `day`.  Fails if that cell
    /// is blank.
    pub fn date_for_cell(&self, week: usize, day: usize) -> Result<ChronicleDate, OutOfRangeCell> {
        self.day_index(week, day)
            .and_then(|i| self.date(i + 1))
            .ok_or(OutOfRangeCell { week, day })
    }

    /// Inverse of [`CalendarGrid::date_for_cell`]: returns the `(week, day)`
    /// coordinates of `date`, or `None` if it is not in this month
    pub fn cell_for_date(&self, date: ChronicleDate) -> Option<(usize, usize)> {
        if date.year() != self.year || date.month() != self.month {
            return None;
        }
        let offset = usize::from(self.start_weekday) + usize::from(date.day()) - 1;
        Some((offset / DAYS_IN_WEEK, offset % DAYS_IN_WEEK))
    }

    pub fn contains(&self, date: ChronicleDate) -> bool {
        self.cell_for_date(date).is_some()
    }

    /// Number of days in column `week` of the column-major layout; zero once
    /// `week` is past the end of the month
    pub fn days_in_week(&self, week: usize) -> usize {
        usize::from(self.days_in_month)
            .saturating_sub(week.saturating_mul(DAYS_IN_WEEK))
            .min(DAYS_IN_WEEK)
    }

    /// Iterate over every cell of the grid, blank or not, in row-major order
    pub fn cells(&self) -> Cells {
        Cells::new(*self)
    }

    /// Iterate over the days of the month in order
    pub fn days(&self) -> impl Iterator<Item = ChronicleDate> {
        let grid = *self;
        (1..=self.days_in_month).filter_map(move |d| grid.date(d))
    }

    /// Iterate over the columns of the column-major layout, yielding each
    /// column's index and how many days it holds
    pub fn columns(&self) -> impl Iterator<Item = (usize, usize)> {
        let grid = *self;
        (0..self.column_count()).map(move |c| (c, grid.days_in_week(c)))
    }

    /// Returns `None` when there is no month before this one within the
    /// supported years
    pub fn previous_month(&self) -> Option<CalendarGrid> {
        let year = match self.month {
            Month::January => self.year.checked_sub(1)?,
            _ => self.year,
        };
        CalendarGrid::for_month(year, self.month.previous()).ok()
    }

    /// Returns `None` when there is no month after this one within the
    /// supported years
    pub fn next_month(&self) -> Option<CalendarGrid> {
        let year = match self.month {
            Month::December => self.year.checked_add(1)?,
            _ => self.year,
        };
        CalendarGrid::for_month(year, self.month.next()).ok()
    }

    pub fn weekday_of_column(day: usize) -> Option<Weekday> {
        let n = u8::try_from(day).ok().filter(|&n| usize::from(n) < DAYS_IN_WEEK)?;
        Some(Weekday::Sunday.nth_next(n))
    }

    // Zero-based day of the month shown at the given cell, if any
    fn day_index(&self, week: usize, day: usize) -> Option<u8> {
        if day >= DAYS_IN_WEEK {
            return None;
        }
        week.checked_mul(DAYS_IN_WEEK)?
            .checked_add(day)?
            .checked_sub(usize::from(self.start_weekday))
            .and_then(|i| u8::try_from(i).ok())
            .filter(|&i| i < self.days_in_month)
    }

    fn date(&self, day: u8) -> Option<ChronicleDate> {
        ChronicleDate::from_calendar_date(self.year, self.month, day).ok()
    }
}

fn month_length(year: i32, month: Month) -> u8 {
    match month {
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February if is_leap_year(year) => 29,
        Month::February => 28,
        _ => 31,
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum InvalidCalendarInput {
    #[error("month {0} is not between 1 and 12")]
    Month(u8),
    #[error("year {0} is not between 1 and 9999")]
    Year(i32),
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("grid cell at week {week}, day {day} is not a day of the month")]
pub struct OutOfRangeCell {
    pub week: usize,
    pub day: usize,
}
