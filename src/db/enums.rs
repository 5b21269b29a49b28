// Closed enumerations for the filterable columns. Stored values are plain
// text; these types gate filter input, so an out-of-domain value is rejected
// before any query runs instead of silently matching nothing.

use std::str::FromStr;

use thiserror::Error;

/// A filter parameter value outside its enumerated domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {domain}: {value:?}")]
pub struct InvalidFilter {
    pub domain: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillCategory {
    Attack,
    Support,
    Recovery,
}

impl SkillCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            SkillCategory::Attack => "Attack",
            SkillCategory::Support => "Support",
            SkillCategory::Recovery => "Recovery",
        }
    }
}

impl FromStr for SkillCategory {
    type Err = InvalidFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Attack" => Ok(SkillCategory::Attack),
            "Support" => Ok(SkillCategory::Support),
            "Recovery" => Ok(SkillCategory::Recovery),
            _ => Err(InvalidFilter {
                domain: "skill category",
                value: s.to_string(),
            }),
        }
    }
}

/// Elemental/thematic skill tags. Matching is exact and case-sensitive
/// against the stored text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillFamily {
    Frizz,
    Sizz,
    Bang,
    Woosh,
    Zap,
    Crack,
    Whack,
    Kamikazee,
    MagicBurst,
    Help,
    Fire,
    Ice,
    Poison,
    Paralyze,
    Sleep,
    Gigaslash,
    Attack,
    Dazzle,
    DrainMagic,
    Fuddle,
    Sap,
    Curse,
    Decelerate,
    BanDance,
    Gobstop,
    LoseTurn,
    Defense,
    StatusSupport,
    Summon,
    Heal,
    StatusRecovery,
    Revive,
    Map,
}

impl SkillFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            SkillFamily::Frizz => "Frizz",
            SkillFamily::Sizz => "Sizz",
            SkillFamily::Bang => "Bang",
            SkillFamily::Woosh => "Woosh",
            SkillFamily::Zap => "Zap",
            SkillFamily::Crack => "Crack",
            SkillFamily::Whack => "Whack",
            SkillFamily::Kamikazee => "Kamikazee",
            SkillFamily::MagicBurst => "Magic Burst",
            SkillFamily::Help => "Help",
            SkillFamily::Fire => "Fire",
            SkillFamily::Ice => "Ice",
            SkillFamily::Poison => "Poison",
            SkillFamily::Paralyze => "Paralyze",
            SkillFamily::Sleep => "Sleep",
            SkillFamily::Gigaslash => "Gigaslash",
            SkillFamily::Attack => "Attack",
            SkillFamily::Dazzle => "Dazzle",
            SkillFamily::DrainMagic => "Drain Magic",
            SkillFamily::Fuddle => "Fuddle",
            SkillFamily::Sap => "Sap",
            SkillFamily::Curse => "Curse",
            SkillFamily::Decelerate => "Decelerate",
            SkillFamily::BanDance => "Ban Dance",
            SkillFamily::Gobstop => "Gobstop",
            SkillFamily::LoseTurn => "Lose a turn",
            SkillFamily::Defense => "Defense",
            SkillFamily::StatusSupport => "Status support",
            SkillFamily::Summon => "Summon",
            SkillFamily::Heal => "Heal",
            SkillFamily::StatusRecovery => "Status recovery",
            SkillFamily::Revive => "Revive",
            SkillFamily::Map => "Map",
        }
    }
}

impl FromStr for SkillFamily {
    type Err = InvalidFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Frizz" => Ok(SkillFamily::Frizz),
            "Sizz" => Ok(SkillFamily::Sizz),
            "Bang" => Ok(SkillFamily::Bang),
            "Woosh" => Ok(SkillFamily::Woosh),
            "Zap" => Ok(SkillFamily::Zap),
            "Crack" => Ok(SkillFamily::Crack),
            "Whack" => Ok(SkillFamily::Whack),
            "Kamikazee" => Ok(SkillFamily::Kamikazee),
            "Magic Burst" => Ok(SkillFamily::MagicBurst),
            "Help" => Ok(SkillFamily::Help),
            "Fire" => Ok(SkillFamily::Fire),
            "Ice" => Ok(SkillFamily::Ice),
            "Poison" => Ok(SkillFamily::Poison),
            "Paralyze" => Ok(SkillFamily::Paralyze),
            "Sleep" => Ok(SkillFamily::Sleep),
            "Gigaslash" => Ok(SkillFamily::Gigaslash),
            "Attack" => Ok(SkillFamily::Attack),
            "Dazzle" => Ok(SkillFamily::Dazzle),
            "Drain Magic" => Ok(SkillFamily::DrainMagic),
            "Fuddle" => Ok(SkillFamily::Fuddle),
            "Sap" => Ok(SkillFamily::Sap),
            "Curse" => Ok(SkillFamily::Curse),
            "Decelerate" => Ok(SkillFamily::Decelerate),
            "Ban Dance" => Ok(SkillFamily::BanDance),
            "Gobstop" => Ok(SkillFamily::Gobstop),
            "Lose a turn" => Ok(SkillFamily::LoseTurn),
            "Defense" => Ok(SkillFamily::Defense),
            "Status support" => Ok(SkillFamily::StatusSupport),
            "Summon" => Ok(SkillFamily::Summon),
            "Heal" => Ok(SkillFamily::Heal),
            "Status recovery" => Ok(SkillFamily::StatusRecovery),
            "Revive" => Ok(SkillFamily::Revive),
            "Map" => Ok(SkillFamily::Map),
            _ => Err(InvalidFilter {
                domain: "skill family",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemCategory {
    Recovery,
    Meat,
    Staff,
    Seed,
    Book,
    DungeonUse,
}

impl ItemCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemCategory::Recovery => "recovery",
            ItemCategory::Meat => "meat",
            ItemCategory::Staff => "staff",
            ItemCategory::Seed => "seed",
            ItemCategory::Book => "book",
            ItemCategory::DungeonUse => "dungeon use",
        }
    }
}

impl FromStr for ItemCategory {
    type Err = InvalidFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recovery" => Ok(ItemCategory::Recovery),
            "meat" => Ok(ItemCategory::Meat),
            "staff" => Ok(ItemCategory::Staff),
            "seed" => Ok(ItemCategory::Seed),
            "book" => Ok(ItemCategory::Book),
            "dungeon use" => Ok(ItemCategory::DungeonUse),
            _ => Err(InvalidFilter {
                domain: "item category",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSellLocation {
    BazaarShop1,
    BazaarShop2,
    BazaarShop3,
    BazaarShop4,
    FieldShop,
    FoundInField,
}

impl ItemSellLocation {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemSellLocation::BazaarShop1 => "Bazaar shop 1",
            ItemSellLocation::BazaarShop2 => "Bazaar shop 2",
            ItemSellLocation::BazaarShop3 => "Bazaar shop 3",
            ItemSellLocation::BazaarShop4 => "Bazaar shop 4",
            ItemSellLocation::FieldShop => "Field shop",
            ItemSellLocation::FoundInField => "found in field",
        }
    }
}

impl FromStr for ItemSellLocation {
    type Err = InvalidFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Bazaar shop 1" => Ok(ItemSellLocation::BazaarShop1),
            "Bazaar shop 2" => Ok(ItemSellLocation::BazaarShop2),
            "Bazaar shop 3" => Ok(ItemSellLocation::BazaarShop3),
            "Bazaar shop 4" => Ok(ItemSellLocation::BazaarShop4),
            "Field shop" => Ok(ItemSellLocation::FieldShop),
            "found in field" => Ok(ItemSellLocation::FoundInField),
            _ => Err(InvalidFilter {
                domain: "sell location",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_stored_values() {
        for value in ["Attack", "Support", "Recovery"] {
            assert_eq!(value.parse::<SkillCategory>().unwrap().as_str(), value);
        }
        for value in ["Magic Burst", "Lose a turn", "Status recovery", "Zap"] {
            assert_eq!(value.parse::<SkillFamily>().unwrap().as_str(), value);
        }
        for value in ["recovery", "dungeon use"] {
            assert_eq!(value.parse::<ItemCategory>().unwrap().as_str(), value);
        }
        for value in ["Bazaar shop 4", "found in field"] {
            assert_eq!(value.parse::<ItemSellLocation>().unwrap().as_str(), value);
        }
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert!("attack".parse::<SkillCategory>().is_err());
        assert!("Meat".parse::<ItemCategory>().is_err());
        assert!("FOUND IN FIELD".parse::<ItemSellLocation>().is_err());
        assert!("zap".parse::<SkillFamily>().is_err());
    }
}
