//! The demonstration character shown when no character record is supplied
use crate::model::{
    Character, ChronicleDate, Gender, ModelError, RankId, RarityTier, Stat, Talisman,
};
use std::num::NonZeroU32;
use time::OffsetDateTime;

/// Ser Napoleon, a knight with a little training in Strength
pub fn napoleon(journeyed_at: OffsetDateTime) -> Result<Character, ModelError> {
    let strength = Stat::new("Strength", 100)
        .with_talisman(Talisman::new(
            NonZeroU32::MIN,
            RarityTier::Common,
            ChronicleDate::new(2024, 2, 10)?,
        ))
        .with_talisman(Talisman::new(
            NonZeroU32::MIN.saturating_add(1),
            RarityTier::Rare,
            ChronicleDate::new(2024, 7, 26)?,
        ));
    Character::new(
        "Napoleon",
        Gender::Male,
        RankId::Knight,
        vec![strength],
        journeyed_at,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn test_napoleon() {
        let character =
            napoleon(datetime!(2024-01-01 00:00 UTC)).expect("sample character should be valid");
        assert_eq!(character.title(), "Ser Napoleon");
        assert_eq!(character.rank().color().to_string(), "#4a9bd1");
        let strength = character.stat("Strength").expect("sample should track Strength");
        assert_eq!(strength.xp(), 100);
        assert_eq!(strength.talisman_count(), 2);
        let talisman = ChronicleDate::from_date(date!(2024 - 07 - 26))
            .ok()
            .and_then(|d| character.find_talisman("Strength", d))
            .expect("talisman for 26 July should be found");
        assert_eq!(talisman.level().get(), 2);
        assert_eq!(talisman.key().to_string(), "26072024");
    }
}
