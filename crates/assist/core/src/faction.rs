//! Faction tags and the enemies/allies filter.
//!
//! Every actor carries one of five tags. Targeting only cares about which of
//! two macro-groups a tag belongs to:
//! - PC side: `PlayerCharacter`, `Ally`
//! - NPC side: `Enemy`, `Troop`
//!
//! `Unknown` belongs to neither. A source with an unknown tag is treated as
//! PC side; a candidate with an unknown tag matches no scoped filter.

/// Actor type tag as reported by the ruleset.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum Faction {
    PlayerCharacter,
    Ally,
    Enemy,
    Troop,
    #[default]
    Unknown,
}

impl Faction {
    /// Parses a host tag, mapping anything unrecognised to `Unknown`.
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or(Self::Unknown)
    }

    /// Macro-group of this tag, if it has one.
    pub const fn side(self) -> Option<Side> {
        match self {
            Self::PlayerCharacter | Self::Ally => Some(Side::Pc),
            Self::Enemy | Self::Troop => Some(Side::Npc),
            Self::Unknown => None,
        }
    }

    /// Macro-group used when this tag belongs to the acting source.
    pub const fn source_side(self) -> Side {
        match self.side() {
            Some(side) => side,
            None => Side::Pc,
        }
    }
}

impl From<String> for Faction {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<Faction> for String {
    fn from(faction: Faction) -> Self {
        faction.as_ref().to_string()
    }
}

/// Faction macro-group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Pc,
    Npc,
}

impl Side {
    pub const fn opposite(self) -> Self {
        match self {
            Self::Pc => Self::Npc,
            Self::Npc => Self::Pc,
        }
    }
}

/// Which factions a target type admits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FactionScope {
    /// No faction check.
    #[default]
    Any,
    /// Candidates on the opposite side of the source.
    Enemies,
    /// Candidates on the same side as the source.
    Allies,
}

impl FactionScope {
    /// Returns true if `candidate` passes this scope for an actor of `source`.
    pub fn admits(self, source: Faction, candidate: Faction) -> bool {
        let source_side = source.source_side();
        match self {
            Self::Any => true,
            Self::Enemies => candidate.side() == Some(source_side.opposite()),
            Self::Allies => candidate.side() == Some(source_side),
        }
    }
}

/// Berserk condition currently carried by an actor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BerserkState {
    /// Berserk subtype, e.g. `"destruction"`.
    #[cfg_attr(feature = "serde", serde(default, rename = "type"))]
    pub subtype: Option<String>,
}

impl BerserkState {
    pub const DESTRUCTION: &'static str = "destruction";

    pub fn new(subtype: impl Into<String>) -> Self {
        Self {
            subtype: Some(subtype.into()),
        }
    }

    pub fn is_destruction(&self) -> bool {
        self.subtype.as_deref() == Some(Self::DESTRUCTION)
    }
}

/// Returns true when the enemies filter is replaced by "anyone but self".
///
/// Requires an attack roll on the item (`"-"` and empty count as none) and a
/// berserk state of subtype exactly `destruction` on the source.
pub fn berserk_override(attack_roll: Option<&str>, berserk: Option<&BerserkState>) -> bool {
    let has_attack = matches!(attack_roll, Some(roll) if !roll.is_empty() && roll != "-");
    has_attack && berserk.is_some_and(BerserkState::is_destruction)
}
