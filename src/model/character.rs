use super::date::{ChronicleDate, DateKey, InvalidDate};
use super::rank::{Rank, RankId, RarityTier};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::num::NonZeroU32;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// An achievement token consumed on a single date
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Talisman {
    level: NonZeroU32,
    rarity: RarityTier,
    consumed_on: ChronicleDate,
}

impl Talisman {
    pub fn new(level: NonZeroU32, rarity: RarityTier, consumed_on: ChronicleDate) -> Talisman {
        Talisman {
            level,
            rarity,
            consumed_on,
        }
    }

    pub fn level(&self) -> NonZeroU32 {
        self.level
    }

    pub fn rarity(&self) -> RarityTier {
        self.rarity
    }

    pub fn consumed_on(&self) -> ChronicleDate {
        self.consumed_on
    }

    pub fn key(&self) -> DateKey {
        self.consumed_on.key()
    }
}

/// A tracked skill of a character, together with its talisman history.
///
/// Talismans are keyed by the [`DateKey`] of the date they were consumed on;
/// the key is always derived from the talisman itself, so no talisman can be
/// filed under a date other than its own.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "StatRecord")]
pub struct Stat {
    name: String,
    xp: u64,
    talismans: HashMap<DateKey, Talisman>,
}

impl Stat {
    pub fn new<S: Into<String>>(name: S, xp: u64) -> Stat {
        Stat {
            name: name.into(),
            xp,
            talismans: HashMap::new(),
        }
    }

    pub fn with_talisman(mut self, talisman: Talisman) -> Stat {
        self.insert(talisman);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn xp(&self) -> u64 {
        self.xp
    }

    pub fn talisman(&self, date: ChronicleDate) -> Option<&Talisman> {
        self.talismans.get(&date.key())
    }

    /// Iterate over the stat's talismans in no particular order
    pub fn talismans(&self) -> impl Iterator<Item = &Talisman> {
        self.talismans.values()
    }

    pub fn talisman_count(&self) -> usize {
        self.talismans.len()
    }

    /// File `talisman` under the date it was consumed on, returning any
    /// talisman previously filed there
    pub fn insert(&mut self, talisman: Talisman) -> Option<Talisman> {
        self.talismans.insert(talisman.key(), talisman)
    }

    pub fn remove(&mut self, date: ChronicleDate) -> Option<Talisman> {
        self.talismans.remove(&date.key())
    }
}

// Incoming shape of a `Stat`, checked for aliased keys before use
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
struct StatRecord {
    name: String,
    #[serde(default)]
    xp: u64,
    #[serde(default)]
    talismans: HashMap<DateKey, Talisman>,
}

impl TryFrom<StatRecord> for Stat {
    type Error = ModelError;

    fn try_from(value: StatRecord) -> Result<Stat, ModelError> {
        if let Some(key) = value
            .talismans
            .iter()
            .find_map(|(&key, t)| (key != t.key()).then_some(key))
        {
            return Err(ModelError::AliasedTalisman {
                stat: value.name,
                key,
            });
        }
        Ok(Stat {
            name: value.name,
            xp: value.xp,
            talismans: value.talismans,
        })
    }
}

/// The character whose progress is chronicled
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "CharacterRecord")]
pub struct Character {
    name: String,
    gender: Gender,
    rank: RankId,
    stats: Vec<Stat>,
    #[serde(with = "time::serde::rfc3339")]
    journeyed_at: OffsetDateTime,
}

impl Character {
    /// Construct a character.  Fails if two of `stats` share a name.
    pub fn new<S: Into<String>>(
        name: S,
        gender: Gender,
        rank: RankId,
        stats: Vec<Stat>,
        journeyed_at: OffsetDateTime,
    ) -> Result<Character, ModelError> {
        if let Some(dup) = duplicate_name(&stats) {
            return Err(ModelError::DuplicateStat(dup.to_owned()));
        }
        let name = name.into();
        debug!(character = %name, stats = stats.len(), "Loaded character");
        Ok(Character {
            name,
            gender,
            rank,
            stats,
            journeyed_at,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn rank_id(&self) -> RankId {
        self.rank
    }

    pub fn rank(&self) -> &'static Rank {
        self.rank.rank()
    }

    pub fn journeyed_at(&self) -> OffsetDateTime {
        self.journeyed_at
    }

    pub fn stats(&self) -> &[Stat] {
        &self.stats
    }

    pub fn stat(&self, name: &str) -> Option<&Stat> {
        self.stats.iter().find(|s| s.name == name)
    }

    /// The character's name together with the title of their rank
    pub fn title(&self) -> String {
        let rank = self.rank();
        if rank.is_suffix() {
            format!("{} {}", self.name, rank.title())
        } else {
            format!("{} {}", rank.title(), self.name)
        }
    }

    /// Look up the talisman consumed on `date` for the stat named `stat`.
    /// Returns `None` if there is no such stat or nothing was consumed on
    /// that date.
    pub fn find_talisman(&self, stat: &str, date: ChronicleDate) -> Option<&Talisman> {
        self.stat(stat)?.talisman(date)
    }

    /// Record `talisman` for the stat named `stat`, replacing whatever was
    /// recorded for that stat on the same date.
    ///
    /// If the character has no such stat, nothing is changed and
    /// [`NoSuchStat`] is returned.
    pub fn set_talisman(
        &mut self,
        stat: &str,
        talisman: Talisman,
    ) -> Result<Option<Talisman>, NoSuchStat> {
        let Some(target) = self.stats.iter_mut().find(|s| s.name == stat) else {
            warn!(
                character = %self.name,
                stat,
                date = %talisman.key(),
                "Character has no such stat; talisman not recorded"
            );
            return Err(NoSuchStat(stat.to_owned()));
        };
        debug!(
            character = %self.name,
            stat,
            date = %talisman.key(),
            level = talisman.level().get(),
            rarity = %talisman.rarity(),
            "Recording talisman"
        );
        Ok(target.insert(talisman))
    }
}

fn duplicate_name(stats: &[Stat]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(stats.len());
    stats.iter().map(Stat::name).find(|&name| !seen.insert(name))
}

// Incoming shape of a `Character`, checked for duplicate stats before use
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
struct CharacterRecord {
    name: String,
    gender: Gender,
    rank: RankId,
    #[serde(default)]
    stats: Vec<Stat>,
    #[serde(default = "OffsetDateTime::now_utc", with = "time::serde::rfc3339")]
    journeyed_at: OffsetDateTime,
}

impl TryFrom<CharacterRecord> for Character {
    type Error = ModelError;

    fn try_from(value: CharacterRecord) -> Result<Character, ModelError> {
        Character::new(
            value.name,
            value.gender,
            value.rank,
            value.stats,
            value.journeyed_at,
        )
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ModelError {
    #[error("stat {0:?} appears more than once")]
    DuplicateStat(String),
    #[error("stat {stat:?} files a talisman under {key}, which is not the date it was consumed on")]
    AliasedTalisman { stat: String, key: DateKey },
    #[error(transparent)]
    InvalidDate(#[from] InvalidDate),
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("character has no stat named {0:?}")]
pub struct NoSuchStat(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn day(date: time::Date) -> ChronicleDate {
        ChronicleDate::from_date(date).expect("date should be within the chronicle's years")
    }

    fn level(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).expect("level should be nonzero")
    }

    fn napoleon(rank: RankId) -> Character {
        Character::new(
            "Napoleon",
            Gender::Male,
            rank,
            vec![Stat::new("Strength", 100), Stat::new("Wisdom", 0)],
            datetime!(2024-01-01 00:00 UTC),
        )
        .expect("stat names should be distinct")
    }

    #[test]
    fn test_title_prefix() {
        assert_eq!(napoleon(RankId::Knight).title(), "Ser Napoleon");
        assert_eq!(napoleon(RankId::Peasant).title(), "Peasant Napoleon");
    }

    #[test]
    fn test_title_suffix() {
        let character = napoleon(RankId::Conqueror);
        assert_eq!(character.title(), "Napoleon the Conqueror");
        assert_eq!(character.rank_id(), RankId::Conqueror);
        assert!(character.rank().is_suffix());
    }

    #[test]
    fn test_set_and_find_talisman() {
        let mut character = napoleon(RankId::Knight);
        let talisman = Talisman::new(level(1), RarityTier::Rare, day(date!(2024 - 10 - 02)));
        assert_eq!(character.set_talisman("Strength", talisman), Ok(None));
        assert_eq!(
            character.find_talisman("Strength", day(date!(2024 - 10 - 02))),
            Some(&talisman)
        );
        assert_eq!(
            character.find_talisman("Strength", day(date!(2024 - 10 - 03))),
            None
        );
        assert_eq!(
            character.find_talisman("Wisdom", day(date!(2024 - 10 - 02))),
            None
        );
        assert_eq!(
            character.find_talisman("Charisma", day(date!(2024 - 10 - 02))),
            None
        );
    }

    #[test]
    fn test_set_talisman_overwrites() {
        let mut character = napoleon(RankId::Knight);
        let first = Talisman::new(level(1), RarityTier::Common, day(date!(2024 - 10 - 02)));
        let second = Talisman::new(level(3), RarityTier::Epic, day(date!(2024 - 10 - 02)));
        assert_eq!(character.set_talisman("Strength", first), Ok(None));
        assert_eq!(character.set_talisman("Strength", second), Ok(Some(first)));
        assert_eq!(
            character.find_talisman("Strength", day(date!(2024 - 10 - 02))),
            Some(&second)
        );
        assert_eq!(
            character.stat("Strength").map(Stat::talisman_count),
            Some(1)
        );
    }

    #[test]
    fn test_set_talisman_missing_stat() {
        let mut character = napoleon(RankId::Knight);
        let before = character.clone();
        let talisman = Talisman::new(level(1), RarityTier::Rare, day(date!(2024 - 10 - 02)));
        assert_eq!(
            character.set_talisman("Charisma", talisman),
            Err(NoSuchStat("Charisma".to_owned()))
        );
        assert_eq!(character, before);
        assert!(character.stat("Charisma").is_none());
    }

    #[test]
    fn test_remove_talisman() {
        let date = day(date!(2024 - 02 - 10));
        let mut stat = Stat::new("Strength", 100)
            .with_talisman(Talisman::new(level(1), RarityTier::Common, date));
        assert!(stat.remove(day(date!(2024 - 02 - 11))).is_none());
        assert!(stat.remove(date).is_some());
        assert_eq!(stat.talisman_count(), 0);
    }

    #[test]
    fn test_duplicate_stats() {
        let r = Character::new(
            "Napoleon",
            Gender::Male,
            RankId::Knight,
            vec![Stat::new("Strength", 1), Stat::new("Strength", 2)],
            datetime!(2024-01-01 00:00 UTC),
        );
        assert_eq!(r, Err(ModelError::DuplicateStat("Strength".to_owned())));
    }

    #[test]
    fn test_deserialize_record() {
        let src = r#"{
            "name": "Josephine",
            "gender": "female",
            "rank": "conqueror",
            "journeyed_at": "2024-03-01T12:00:00Z",
            "stats": [
                {
                    "name": "Strength",
                    "xp": 100,
                    "talismans": {
                        "26072024": {
                            "level": 2,
                            "rarity": "rare",
                            "consumed_on": {"day": 26, "month": 7, "year": 2024}
                        }
                    }
                }
            ]
        }"#;
        let character =
            serde_json::from_str::<Character>(src).expect("record should deserialize");
        assert_eq!(character.title(), "Josephine the Conqueror");
        assert_eq!(character.gender(), Gender::Female);
        assert_eq!(character.journeyed_at(), datetime!(2024-03-01 12:00 UTC));
        let talisman = character
            .find_talisman("Strength", day(date!(2024 - 07 - 26)))
            .expect("talisman should be found");
        assert_eq!(talisman.level().get(), 2);
        assert_eq!(talisman.rarity(), RarityTier::Rare);
    }

    #[test]
    fn test_deserialize_aliased_key() {
        let src = r#"{
            "name": "Strength",
            "talismans": {
                "27072024": {
                    "level": 2,
                    "rarity": "rare",
                    "consumed_on": {"day": 26, "month": 7, "year": 2024}
                }
            }
        }"#;
        let r = serde_json::from_str::<Stat>(src);
        assert!(r.is_err(), "aliased talisman should be rejected");
    }

    #[test]
    fn test_deserialize_duplicate_stats() {
        let src = r#"{
            "name": "Napoleon",
            "gender": "male",
            "rank": "knight",
            "stats": [{"name": "Strength"}, {"name": "Strength"}]
        }"#;
        let r = serde_json::from_str::<Character>(src);
        assert!(r.is_err(), "duplicate stats should be rejected");
    }

    #[test]
    fn test_serialize_roundtrip() {
        let mut character = napoleon(RankId::Lord);
        let talisman = Talisman::new(level(4), RarityTier::Legendary, day(date!(2024 - 12 - 25)));
        assert!(character.set_talisman("Wisdom", talisman).is_ok());
        let json = serde_json::to_string(&character).expect("serializing should not fail");
        assert!(json.contains(r#""25122024""#), "talismans should be keyed by DDMMYYYY");
        let back = serde_json::from_str::<Character>(&json).expect("deserializing should not fail");
        assert_eq!(back, character);
        assert_eq!(back.rank_id(), RankId::Lord);
    }

    #[test]
    fn test_stat_talismans() {
        let first = Talisman::new(level(1), RarityTier::Common, day(date!(2024 - 02 - 10)));
        let second = Talisman::new(level(2), RarityTier::Rare, day(date!(2024 - 07 - 26)));
        let stat = Stat::new("Strength", 100)
            .with_talisman(first)
            .with_talisman(second);
        let mut levels = stat.talismans().map(|t| t.level().get()).collect::<Vec<_>>();
        levels.sort_unstable();
        assert_eq!(levels, [1, 2]);
        assert_eq!(stat.talismans().count(), stat.talisman_count());
        assert!(stat.talismans().all(|t| stat.talisman(t.consumed_on()) == Some(t)));
    }
}
