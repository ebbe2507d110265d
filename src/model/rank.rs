use serde::{Deserialize, Serialize};
use std::fmt;

/// An RGB color, displayed as `#rrggbb`
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Rarity of a talisman or rank, from least to most prestigious.  Each tier
/// is drawn in its own fixed color.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RarityTier {
    Junk,
    Poor,
    Normal,
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Unique,
    Mythic,
    Hightower,
}

impl RarityTier {
    pub const ALL: [RarityTier; 11] = [
        RarityTier::Junk,
        RarityTier::Poor,
        RarityTier::Normal,
        RarityTier::Common,
        RarityTier::Uncommon,
        RarityTier::Rare,
        RarityTier::Epic,
        RarityTier::Legendary,
        RarityTier::Unique,
        RarityTier::Mythic,
        RarityTier::Hightower,
    ];

    pub const fn color(self) -> Color {
        match self {
            RarityTier::Junk => Color::from_rgb(0x32, 0x32, 0x32),
            RarityTier::Poor => Color::from_rgb(0x64, 0x64, 0x64),
            RarityTier::Normal => Color::from_rgb(0x98, 0x90, 0x84),
            RarityTier::Common => Color::from_rgb(0xde, 0xde, 0xde),
            RarityTier::Uncommon => Color::from_rgb(0x62, 0xbe, 0x0b),
            RarityTier::Rare => Color::from_rgb(0x4a, 0x9b, 0xd1),
            RarityTier::Epic => Color::from_rgb(0xad, 0x5a, 0xff),
            RarityTier::Legendary => Color::from_rgb(0xf7, 0xa2, 0x2d),
            RarityTier::Unique => Color::from_rgb(0xe3, 0xd8, 0x8c),
            RarityTier::Mythic => Color::from_rgb(0xe5, 0x41, 0x41),
            RarityTier::Hightower => Color::from_rgb(0x1b, 0x4a, 0x0f),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            RarityTier::Junk => "junk",
            RarityTier::Poor => "poor",
            RarityTier::Normal => "normal",
            RarityTier::Common => "common",
            RarityTier::Uncommon => "uncommon",
            RarityTier::Rare => "rare",
            RarityTier::Epic => "epic",
            RarityTier::Legendary => "legendary",
            RarityTier::Unique => "unique",
            RarityTier::Mythic => "mythic",
            RarityTier::Hightower => "hightower",
        }
    }
}

impl fmt::Display for RarityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A tier of achievement, determining a character's title and color
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Rank {
    name: &'static str,
    title: &'static str,
    rarity: RarityTier,
    xp_threshold: u64,
    suffix: bool,
}

impl Rank {
    const fn new(name: &'static str, title: &'static str, rarity: RarityTier, xp_threshold: u64) -> Rank {
        Rank {
            name,
            title,
            rarity,
            xp_threshold,
            suffix: false,
        }
    }

    const fn suffixed(self) -> Rank {
        Rank {
            suffix: true,
            ..self
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Honorific attached to a character's name
    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn rarity(&self) -> RarityTier {
        self.rarity
    }

    pub fn color(&self) -> Color {
        self.rarity.color()
    }

    /// Minimum experience needed to hold this rank
    pub fn xp_threshold(&self) -> u64 {
        self.xp_threshold
    }

    /// Whether the title follows the name ("Napoleon the Conqueror") rather
    /// than preceding it ("Ser Napoleon")
    pub fn is_suffix(&self) -> bool {
        self.suffix
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

static PEASANT: Rank = Rank::new("Peasant", "Peasant", RarityTier::Poor, 0);
static SQUIRE: Rank = Rank::new("Squire", "Squire", RarityTier::Uncommon, 100);
static KNIGHT: Rank = Rank::new("Knight", "Ser", RarityTier::Rare, 5_000);
static LORD: Rank = Rank::new("Lord", "Lord", RarityTier::Epic, 100_000);
static ROYAL: Rank = Rank::new("Royal", "Grace", RarityTier::Legendary, 1_000_000);
static MYTHICAL: Rank = Rank::new("Mythical", "Mythic", RarityTier::Unique, 5_000_000);
static CONQUEROR: Rank =
    Rank::new("Conqueror", "the Conqueror", RarityTier::Mythic, 10_000_000).suffixed();

/// Key of an entry in the static rank table.  Variants are declared (and
/// enumerated) in order of increasing experience threshold.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RankId {
    Peasant,
    Squire,
    Knight,
    Lord,
    Royal,
    Mythical,
    Conqueror,
}

impl RankId {
    pub const ALL: [RankId; 7] = [
        RankId::Peasant,
        RankId::Squire,
        RankId::Knight,
        RankId::Lord,
        RankId::Royal,
        RankId::Mythical,
        RankId::Conqueror,
    ];

    pub fn rank(self) -> &'static Rank {
        match self {
            RankId::Peasant => &PEASANT,
            RankId::Squire => &SQUIRE,
            RankId::Knight => &KNIGHT,
            RankId::Lord => &LORD,
            RankId::Royal => &ROYAL,
            RankId::Mythical => &MYTHICAL,
            RankId::Conqueror => &CONQUEROR,
        }
    }
}

/// Iterate over the rank table in order of increasing experience threshold
pub fn ranks() -> impl Iterator<Item = (RankId, &'static Rank)> {
    RankId::ALL.into_iter().map(|id| (id, id.rank()))
}
