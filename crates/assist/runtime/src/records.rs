//! Item and actor sheets as the runtime sees them.
//!
//! Only the fields the targeting flows read are modelled. The serde shape
//! follows the host's camelCase documents so fixtures can be lifted from a
//! world export.
use std::fmt;

use serde::{Deserialize, Serialize};

use assist_core::{
    ActorId, BerserkState, Constituent, Faction, ItemKind, LevelValue, ResolutionContext,
};

/// Host identifier of an item.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub id: ItemId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(default)]
    pub level: Option<LevelValue>,
    /// Attack roll mode; `"-"` or empty means the item does not attack.
    #[serde(default)]
    pub attack_roll: Option<String>,
    /// Constituent effect ids of a combo. `"-"` entries are placeholders.
    #[serde(default)]
    pub effect_ids: Vec<ItemId>,
}

impl ItemRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.into(),
            kind,
            level: None,
            attack_roll: None,
            effect_ids: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: LevelValue) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn with_attack_roll(mut self, roll: impl Into<String>) -> Self {
        self.attack_roll = Some(roll.into());
        self
    }

    #[must_use]
    pub fn with_effects(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.effect_ids = ids.into_iter().map(ItemId::new).collect();
        self
    }

    /// Whether `display_name` names this item, with or without its ruby.
    pub fn answers_to(&self, display_name: &str) -> bool {
        self.name == display_name || assist_core::item::strip_ruby(&self.name) == display_name
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorConditions {
    #[serde(default)]
    pub berserk: Option<BerserkState>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorRecord {
    pub id: ActorId,
    pub name: String,
    #[serde(default)]
    pub faction: Faction,
    #[serde(default)]
    pub conditions: ActorConditions,
    /// Items embedded in this actor's sheet.
    #[serde(default)]
    pub items: Vec<ItemId>,
}

impl ActorRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, faction: Faction) -> Self {
        Self {
            id: ActorId::new(id),
            name: name.into(),
            faction,
            conditions: ActorConditions::default(),
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_items(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.items = ids.into_iter().map(ItemId::new).collect();
        self
    }

    #[must_use]
    pub fn with_berserk(mut self, berserk: BerserkState) -> Self {
        self.conditions.berserk = Some(berserk);
        self
    }

    pub fn owns(&self, item: &ItemId) -> bool {
        self.items.contains(item)
    }
}

// ============================================================================
// Resolution context
// ============================================================================

/// Builds the context the N resolver sees for `item`.
///
/// A combo's constituents are its effect ids that resolve, through
/// `lookup`, to effect or psionic items owned by `owner`. Without an owner
/// a combo has no constituents.
pub fn resolution_context<F>(
    item: &ItemRecord,
    owner: Option<&ActorRecord>,
    lookup: F,
) -> ResolutionContext
where
    F: Fn(&ItemId) -> Option<ItemRecord>,
{
    match item.kind {
        ItemKind::Combo => {
            let constituents = owner
                .map(|actor| {
                    item.effect_ids
                        .iter()
                        .filter(|id| !id.as_str().is_empty() && id.as_str() != "-")
                        .filter(|id| actor.owns(id))
                        .filter_map(&lookup)
                        .filter(|effect| effect.kind.is_combo_constituent())
                        .map(|effect| Constituent::new(effect.name, effect.level))
                        .collect()
                })
                .unwrap_or_default();
            ResolutionContext::combo(constituents)
        }
        kind => ResolutionContext {
            kind,
            level: item.level.clone(),
            constituents: Vec::new(),
        },
    }
}
