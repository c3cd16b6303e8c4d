//! Item-side inputs of the N-value resolver.
//!
//! The host ruleset stores levels either as a bare number or as a structured
//! `{ value, init }` record, and sometimes as text. [`LevelValue`] accepts
//! all of those shapes so the resolver never sees raw host data.

/// Ruleset item type.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ItemKind {
    Combo,
    Effect,
    Spell,
    Psionic,
    /// Any item type the assistant does not handle (weapons, armor, ...).
    Other,
}

impl ItemKind {
    /// Returns true for item types that get a targeting configuration.
    pub const fn is_targetable(self) -> bool {
        !matches!(self, Self::Other)
    }

    /// Returns true for item types whose own level `[level]` may reference.
    pub const fn carries_level(self) -> bool {
        matches!(self, Self::Effect | Self::Psionic)
    }

    /// Returns true for item types that may appear inside a combo.
    pub const fn is_combo_constituent(self) -> bool {
        matches!(self, Self::Effect | Self::Psionic)
    }
}

impl From<String> for ItemKind {
    fn from(tag: String) -> Self {
        tag.parse().unwrap_or(Self::Other)
    }
}

impl From<ItemKind> for String {
    fn from(kind: ItemKind) -> Self {
        kind.as_ref().to_string()
    }
}

/// A level field component as stored by the host: number or numeric text.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum LevelScalar {
    Number(f64),
    Text(String),
}

impl LevelScalar {
    fn to_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// Level data of an item.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum LevelValue {
    /// Bare number (or numeric text).
    Raw(LevelScalar),
    /// Structured record; `value` wins over `init` when present.
    Structured {
        #[cfg_attr(feature = "serde", serde(default))]
        value: Option<LevelScalar>,
        #[cfg_attr(feature = "serde", serde(default))]
        init: Option<LevelScalar>,
    },
}

impl LevelValue {
    pub fn raw(level: f64) -> Self {
        Self::Raw(LevelScalar::Number(level))
    }

    pub fn structured(value: Option<f64>, init: Option<f64>) -> Self {
        Self::Structured {
            value: value.map(LevelScalar::Number),
            init: init.map(LevelScalar::Number),
        }
    }

    /// Extracts a positive level. A present `value` is used even if it is
    /// not a valid number; `init` is only consulted when `value` is absent.
    pub fn extract(&self) -> Option<f64> {
        let level = match self {
            Self::Raw(scalar) => scalar.to_number(),
            Self::Structured {
                value: Some(value), ..
            } => value.to_number(),
            Self::Structured {
                value: None,
                init: Some(init),
            } => init.to_number(),
            Self::Structured {
                value: None,
                init: None,
            } => None,
        }?;

        (level.is_finite() && level > 0.0).then_some(level)
    }
}

/// An item inside a combo, as seen by `[<name>]` references.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constituent {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub level: Option<LevelValue>,
}

impl Constituent {
    pub fn new(name: impl Into<String>, level: Option<LevelValue>) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }
}

/// Everything the resolver may look up while substituting references.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolutionContext {
    pub kind: ItemKind,
    pub level: Option<LevelValue>,
    /// Constituent items, in combo order. Empty for non-combo items.
    pub constituents: Vec<Constituent>,
}

impl ResolutionContext {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            level: None,
            constituents: Vec::new(),
        }
    }

    /// Context for an effect-like item with the given level.
    pub fn leveled(kind: ItemKind, level: LevelValue) -> Self {
        Self {
            level: Some(level),
            ..Self::new(kind)
        }
    }

    /// Context for a combo built from `constituents`.
    pub fn combo(constituents: Vec<Constituent>) -> Self {
        Self {
            constituents,
            ..Self::new(ItemKind::Combo)
        }
    }
}

/// Drops a trailing ruby annotation (`Name|Reading` or `Name｜Reading`).
pub fn strip_ruby(name: &str) -> &str {
    name.split(['|', '｜']).next().unwrap_or(name).trim()
}
