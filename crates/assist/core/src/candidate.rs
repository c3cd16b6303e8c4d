//! Tokens on the canvas that may become targets.

use std::fmt;

use crate::faction::Faction;
use crate::geometry::{Point, Rect, Size};

/// Host identifier of a token placed on the canvas.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TokenId(pub String);

/// Host identifier of an actor (the sheet behind one or more tokens).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ActorId(pub String);

impl TokenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A positioned, sized token eligible for targeting.
///
/// `hidden` and `visible` mirror the host's two independent visibility
/// signals. A missing flag never hides a token; only an explicit
/// `hidden: Some(true)` or `visible: Some(false)` does.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Candidate {
    pub id: TokenId,
    /// Owning actor. Tokens without an actor are never targeted.
    #[cfg_attr(feature = "serde", serde(default))]
    pub actor: Option<ActorId>,
    /// Top-left corner in pixels.
    pub position: Point,
    /// Footprint in pixels.
    pub size: Size,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hidden: Option<bool>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub visible: Option<bool>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stealthed: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub faction: Faction,
}

impl Candidate {
    /// Visible, unstealthed token of the given faction.
    pub fn new(
        id: impl Into<String>,
        actor: impl Into<String>,
        position: Point,
        size: Size,
        faction: Faction,
    ) -> Self {
        Self {
            id: TokenId::new(id),
            actor: Some(ActorId::new(actor)),
            position,
            size,
            hidden: None,
            visible: None,
            stealthed: false,
            faction,
        }
    }

    #[must_use]
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    #[must_use]
    pub fn with_stealth(mut self, stealthed: bool) -> Self {
        self.stealthed = stealthed;
        self
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin(self.position, self.size)
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden == Some(true) || self.visible == Some(false)
    }

    pub fn is_owned_by(&self, actor: &ActorId) -> bool {
        self.actor.as_ref() == Some(actor)
    }
}
