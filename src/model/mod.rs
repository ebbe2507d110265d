mod character;
mod date;
mod rank;
pub use self::character::{Character, Gender, ModelError, NoSuchStat, Stat, Talisman};
pub use self::date::{ChronicleDate, DateKey, InvalidDate, ParseDateKeyError, MAX_YEAR, MIN_YEAR};
pub use self::rank::{ranks, Color, Rank, RankId, RarityTier};
