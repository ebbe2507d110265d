use super::{CalendarGrid, DAYS_IN_WEEK};
use crate::model::ChronicleDate;
use std::iter::FusedIterator;
use time::Weekday;

pub(super) trait WeekdayExt {
    fn index0(&self) -> u8;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> u8 {
        self.number_days_from_sunday()
    }
}

/// A single cell of a [`CalendarGrid`]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Cell {
    week: usize,
    day: usize,
    // `None` for blank cells
    date: Option<ChronicleDate>,
}

impl Cell {
    /// Zero-based row
    pub fn week(&self) -> usize {
        self.week
    }

    /// Zero-based column, where 0 is Sunday
    pub fn day(&self) -> usize {
        self.day
    }

    pub fn weekday(&self) -> Option<Weekday> {
        CalendarGrid::weekday_of_column(self.day)
    }

    pub fn date(&self) -> Option<ChronicleDate> {
        self.date
    }

    pub fn is_populated(&self) -> bool {
        self.date.is_some()
    }
}

/// Iterator over the cells of a [`CalendarGrid`] in row-major order: every
/// column of week 0, then every column of week 1, and so on
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cells {
    grid: CalendarGrid,
    next: usize,
    end: usize,
}

impl Cells {
    pub(super) fn new(grid: CalendarGrid) -> Cells {
        Cells {
            grid,
            next: 0,
            end: grid.row_count() * DAYS_IN_WEEK,
        }
    }
}

impl Iterator for Cells {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        if self.next >= self.end {
            return None;
        }
        let (week, day) = (self.next / DAYS_IN_WEEK, self.next % DAYS_IN_WEEK);
        self.next += 1;
        Some(Cell {
            week,
            day,
            date: self.grid.date_for_cell(week, day).ok(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end.saturating_sub(self.next);
        (len, Some(len))
    }
}

impl ExactSizeIterator for Cells {}

impl FusedIterator for Cells {}
