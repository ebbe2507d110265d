use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use time::{Date, Month, Weekday};

/// Earliest year a [`ChronicleDate`] may fall in
pub const MIN_YEAR: i32 = 1;

/// Latest year a [`ChronicleDate`] may fall in.  Together with [`MIN_YEAR`],
/// this keeps every year exactly four digits wide in a [`DateKey`].
pub const MAX_YEAR: i32 = 9999;

/// A real calendar date on which a talisman can be consumed.
///
/// Construction goes through [`time::Date`], so the day is always within the
/// actual length of its month, and the year is limited to
/// `MIN_YEAR..=MAX_YEAR`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "DateRecord", into = "DateRecord")]
pub struct ChronicleDate(Date);

impl ChronicleDate {
    /// Construct a date from numeric components
    pub fn new(year: i32, month: u8, day: u8) -> Result<ChronicleDate, InvalidDate> {
        let month = Month::try_from(month).map_err(|_| InvalidDate::Month(month))?;
        ChronicleDate::from_calendar_date(year, month, day)
    }

    pub fn from_calendar_date(year: i32, month: Month, day: u8) -> Result<ChronicleDate, InvalidDate> {
        check_year(year)?;
        Date::from_calendar_date(year, month, day)
            .map(ChronicleDate)
            .map_err(|_| InvalidDate::Day { year, month, day })
    }

    pub fn from_date(date: Date) -> Result<ChronicleDate, InvalidDate> {
        check_year(date.year())?;
        Ok(ChronicleDate(date))
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> Month {
        self.0.month()
    }

    pub fn day(self) -> u8 {
        self.0.day()
    }

    pub fn weekday(self) -> Weekday {
        self.0.weekday()
    }

    pub fn as_date(self) -> Date {
        self.0
    }

    /// The canonical key under which a talisman consumed on this date is
    /// stored
    pub fn key(self) -> DateKey {
        DateKey::encode(self)
    }
}

impl fmt::Display for ChronicleDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.day(), self.month(), self.year())
    }
}

fn check_year(year: i32) -> Result<(), InvalidDate> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(InvalidDate::Year(year))
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum InvalidDate {
    #[error("month {0} is not between 1 and 12")]
    Month(u8),
    #[error("year {0} is not between 1 and 9999")]
    Year(i32),
    #[error("{month} {year} has no day {day}")]
    Day { year: i32, month: Month, day: u8 },
}

// Serialized shape of a `ChronicleDate`
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
struct DateRecord {
    day: u8,
    month: u8,
    year: i32,
}

impl TryFrom<DateRecord> for ChronicleDate {
    type Error = InvalidDate;

    fn try_from(value: DateRecord) -> Result<ChronicleDate, InvalidDate> {
        ChronicleDate::new(value.year, value.month, value.day)
    }
}

impl From<ChronicleDate> for DateRecord {
    fn from(value: ChronicleDate) -> DateRecord {
        DateRecord {
            day: value.day(),
            month: value.month().into(),
            year: value.year(),
        }
    }
}

/// Canonical identity of a date: zero-padded day, zero-padded month, and
/// four-digit year with no separators, e.g. `02102024` for 2 October 2024.
///
/// Because every component has a fixed width, encoding is injective, and
/// [`DateKey::decode`] inverts [`DateKey::encode`] exactly.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(ChronicleDate);

impl DateKey {
    /// Length in bytes of every canonical key
    pub const LEN: usize = 8;

    pub fn encode(date: ChronicleDate) -> DateKey {
        DateKey(date)
    }

    pub fn decode(key: &str) -> Result<ChronicleDate, ParseDateKeyError> {
        key.parse::<DateKey>().map(DateKey::date)
    }

    pub fn date(self) -> ChronicleDate {
        self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}{:02}{:04}",
            self.0.day(),
            u8::from(self.0.month()),
            self.0.year()
        )
    }
}

impl FromStr for DateKey {
    type Err = ParseDateKeyError;

    fn from_str(s: &str) -> Result<DateKey, ParseDateKeyError> {
        let Ok(digits) = <[u8; DateKey::LEN]>::try_from(s.as_bytes()) else {
            return Err(ParseDateKeyError::Malformed(s.to_owned()));
        };
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(ParseDateKeyError::Malformed(s.to_owned()));
        }
        let [d1, d2, m1, m2, y1, y2, y3, y4] = digits.map(|b| b - b'0');
        let day = d1 * 10 + d2;
        let month = m1 * 10 + m2;
        let year = [y1, y2, y3, y4]
            .into_iter()
            .fold(0i32, |acc, d| acc * 10 + i32::from(d));
        ChronicleDate::new(year, month, day)
            .map(DateKey)
            .map_err(|source| ParseDateKeyError::InvalidDate {
                key: s.to_owned(),
                source,
            })
    }
}

impl TryFrom<String> for DateKey {
    type Error = ParseDateKeyError;

    fn try_from(value: String) -> Result<DateKey, ParseDateKeyError> {
        value.parse()
    }
}

impl From<DateKey> for String {
    fn from(value: DateKey) -> String {
        value.to_string()
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ParseDateKeyError {
    #[error("date key {0:?} is not exactly eight ASCII digits")]
    Malformed(String),
    #[error("date key {key:?} does not name a real date")]
    InvalidDate {
        key: String,
        #[source]
        source: InvalidDate,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use time::macros::date;

    fn chronicle_date(date: Date) -> ChronicleDate {
        ChronicleDate::from_date(date).expect("date should be within the chronicle's years")
    }

    #[test]
    fn test_encode() {
        assert_eq!(
            DateKey::encode(chronicle_date(date!(2024 - 10 - 02))).to_string(),
            "02102024"
        );
        assert_eq!(
            DateKey::encode(chronicle_date(date!(2024 - 07 - 26))).to_string(),
            "26072024"
        );
        let early = ChronicleDate::new(987, 1, 9).expect("9 January 987 should be valid");
        assert_eq!(DateKey::encode(early).to_string(), "09010987");
    }

    #[test]
    fn test_decode() {
        assert_eq!(
            DateKey::decode("10022024"),
            Ok(chronicle_date(date!(2024 - 02 - 10)))
        );
        assert_eq!(
            DateKey::decode("29022024"),
            Ok(chronicle_date(date!(2024 - 02 - 29)))
        );
        assert_eq!(
            DateKey::decode("02102024").map(ChronicleDate::as_date),
            Ok(date!(2024 - 10 - 02))
        );
    }

    #[test]
    fn test_decode_malformed() {
        for key in ["", "0210202", "021020245", "02-10-24", "o2102024", "０2102024"] {
            assert_eq!(
                DateKey::decode(key),
                Err(ParseDateKeyError::Malformed(key.to_owned())),
                "{key:?} should be rejected as malformed"
            );
        }
    }

    #[test]
    fn test_decode_impossible_date() {
        assert_eq!(
            DateKey::decode("29022023"),
            Err(ParseDateKeyError::InvalidDate {
                key: "29022023".to_owned(),
                source: InvalidDate::Day {
                    year: 2023,
                    month: Month::February,
                    day: 29
                },
            })
        );
        assert_eq!(
            DateKey::decode("01132024"),
            Err(ParseDateKeyError::InvalidDate {
                key: "01132024".to_owned(),
                source: InvalidDate::Month(13),
            })
        );
        assert_eq!(
            DateKey::decode("01010000"),
            Err(ParseDateKeyError::InvalidDate {
                key: "01010000".to_owned(),
                source: InvalidDate::Year(0),
            })
        );
    }

    #[test]
    fn test_year_bounds() {
        assert_eq!(ChronicleDate::new(-1, 12, 31), Err(InvalidDate::Year(-1)));
        assert!(ChronicleDate::new(MAX_YEAR, 12, 31).is_ok());
        assert_eq!(ChronicleDate::new(10000, 1, 1), Err(InvalidDate::Year(10000)));
    }

    #[test]
    fn test_serde_shapes() {
        let date = chronicle_date(date!(2024 - 10 - 02));
        assert_eq!(
            serde_json::to_string(&date).expect("serializing a date should not fail"),
            r#"{"day":2,"month":10,"year":2024}"#
        );
        assert_eq!(
            serde_json::to_string(&date.key()).expect("serializing a key should not fail"),
            r#""02102024""#
        );
        let bad = serde_json::from_str::<ChronicleDate>(r#"{"day":31,"month":4,"year":2024}"#);
        assert!(bad.is_err(), "31 April should not deserialize");
    }

    fn any_date() -> impl Strategy<Value = ChronicleDate> {
        (MIN_YEAR..=MAX_YEAR, 1u8..=12, 1u8..=31)
            .prop_filter_map("not a real date", |(y, m, d)| ChronicleDate::new(y, m, d).ok())
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(date in any_date()) {
            let key = DateKey::encode(date).to_string();
            prop_assert_eq!(key.len(), DateKey::LEN);
            prop_assert_eq!(DateKey::decode(&key), Ok(date));
        }

        #[test]
        fn encode_inverts_decode(key in "[0-3][0-9][01][0-9][0-9]{4}") {
            if let Ok(date) = DateKey::decode(&key) {
                prop_assert_eq!(DateKey::encode(date).to_string(), key);
            }
        }
    }
}
