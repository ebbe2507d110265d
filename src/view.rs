use crate::grid::{CalendarGrid, Cell, Cells};
use crate::model::{Character, Stat, Talisman};

/// One month of one stat's talismans, laid out on a [`CalendarGrid`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChronicleView<'a> {
    character: &'a Character,
    stat: &'a str,
    grid: CalendarGrid,
}

impl<'a> ChronicleView<'a> {
    pub fn new(character: &'a Character, stat: &'a str, grid: CalendarGrid) -> Self {
        ChronicleView {
            character,
            stat,
            grid,
        }
    }

    pub fn character(&self) -> &'a Character {
        self.character
    }

    pub fn grid(&self) -> CalendarGrid {
        self.grid
    }

    pub fn stat_name(&self) -> &'a str {
        self.stat
    }

    /// Returns `None` if the character has no stat by the view's stat name
    pub fn stat(&self) -> Option<&'a Stat> {
        self.character.stat(self.stat)
    }

    /// Iterate over the grid's cells in row-major order, each with the
    /// talisman consumed on its date, if any
    pub fn cells(&self) -> ChronicleCells<'a> {
        ChronicleCells {
            character: self.character,
            stat: self.stat,
            cells: self.grid.cells(),
        }
    }

    /// Iterate over the talismans consumed during the month, in date order
    pub fn talismans(&self) -> impl Iterator<Item = &'a Talisman> {
        self.cells().filter_map(|c| c.talisman)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChronicleCell<'a> {
    pub cell: Cell,
    pub talisman: Option<&'a Talisman>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChronicleCells<'a> {
    character: &'a Character,
    stat: &'a str,
    cells: Cells,
}

impl<'a> Iterator for ChronicleCells<'a> {
    type Item = ChronicleCell<'a>;

    fn next(&mut self) -> Option<ChronicleCell<'a>> {
        let cell = self.cells.next()?;
        let talisman = cell
            .date()
            .and_then(|date| self.character.find_talisman(self.stat, date));
        Some(ChronicleCell { cell, talisman })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cells.size_hint()
    }
}

impl ExactSizeIterator for ChronicleCells<'_> {}
