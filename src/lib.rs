//! A calendar of a character's progress: each month is laid out as a grid of
//! weeks, and each day of the grid may hold a talisman earned for one of the
//! character's stats.
//!
//! [`CalendarGrid`] does the date arithmetic for a single month, while
//! [`Character`] holds the stats and talismans being chronicled.
//! [`ChronicleView`] joins the two for display.
pub mod grid;
pub mod model;
pub mod sample;
pub mod view;
pub use crate::grid::{
    CalendarGrid, Cell, Cells, InvalidCalendarInput, OutOfRangeCell, DAYS_IN_WEEK,
};
pub use crate::model::{
    ranks, Character, ChronicleDate, Color, DateKey, Gender, InvalidDate, ModelError, NoSuchStat,
    ParseDateKeyError, Rank, RankId, RarityTier, Stat, Talisman,
};
pub use crate::view::{ChronicleCell, ChronicleCells, ChronicleView};
