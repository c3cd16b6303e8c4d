//! Spatial target selection.
//!
//! Given a [`SelectionRequest`] and the tokens on the canvas, [`select`]
//! returns the tokens that should become targets. Two geometric modes
//! exist:
//!
//! - **Anchored** (Single, N, Area*): a square footprint centered on the
//!   picked anchor; a token is hit when its bounds overlap the square.
//! - **Highlighted region** (Scene*): a token is hit when its center lies in
//!   a cell of the source's range highlight. No region means no targets.
//!
//! Incremental N-target picking is tracked by [`NTargetProgress`], which
//! feeds already-selected ids back into each request.

pub mod anchored;
pub mod filter;
pub mod incremental;
pub mod region;

pub use anchored::footprint_rect;
pub use filter::is_eligible;
pub use incremental::NTargetProgress;
pub use region::HighlightedRegion;

use std::collections::BTreeSet;

use crate::candidate::{ActorId, Candidate, TokenId};
use crate::config::{TargetType, TargetingConfig};
use crate::error::{AssistError, ErrorSeverity};
use crate::faction::{Faction, FactionScope};
use crate::geometry::{GridGeometry, Point};

// ============================================================================
// Footprint
// ============================================================================

/// Size of the square a pick covers, in grid units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Footprint {
    /// 1×1, used by Single and N.
    Single,
    /// 3×3, used by the Area types.
    Area,
}

impl Footprint {
    pub const fn squares(self) -> u8 {
        match self {
            Self::Single => 1,
            Self::Area => 3,
        }
    }

    /// Side length in pixels for a grid unit of `cell_size`.
    pub fn side(self, cell_size: f64) -> f64 {
        f64::from(self.squares()) * cell_size
    }
}

// ============================================================================
// Request
// ============================================================================

/// Everything [`select`] needs besides the candidates and the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionRequest {
    pub target_type: TargetType,
    /// Picked point. Required for anchored types, ignored for scene types.
    pub anchor: Option<Point>,
    pub source_actor: Option<ActorId>,
    pub source_faction: Faction,
    pub exclude_self: bool,
    pub ignore_stealth: bool,
    /// Berserk-destruction override: enemies become "anyone but self".
    pub berserk_override: bool,
    pub region: Option<HighlightedRegion>,
    /// Tokens picked by earlier iterations of an N-target flow.
    pub already_selected: BTreeSet<TokenId>,
}

impl SelectionRequest {
    pub fn new(target_type: TargetType) -> Self {
        Self {
            target_type,
            anchor: None,
            source_actor: None,
            source_faction: Faction::Unknown,
            exclude_self: false,
            ignore_stealth: false,
            berserk_override: false,
            region: None,
            already_selected: BTreeSet::new(),
        }
    }

    /// Request carrying the saved options of `config`.
    pub fn from_config(config: &TargetingConfig) -> Self {
        Self::new(config.target_type)
            .with_ignore_stealth(config.ignore_stealth)
            .with_exclude_self(config.wants_exclude_self())
    }

    #[must_use]
    pub fn with_anchor(mut self, anchor: Point) -> Self {
        self.anchor = Some(anchor);
        self
    }

    #[must_use]
    pub fn with_source(mut self, actor: Option<ActorId>, faction: Faction) -> Self {
        self.source_actor = actor;
        self.source_faction = faction;
        self
    }

    #[must_use]
    pub fn with_exclude_self(mut self, exclude_self: bool) -> Self {
        self.exclude_self = exclude_self;
        self
    }

    #[must_use]
    pub fn with_ignore_stealth(mut self, ignore_stealth: bool) -> Self {
        self.ignore_stealth = ignore_stealth;
        self
    }

    #[must_use]
    pub fn with_berserk_override(mut self, berserk_override: bool) -> Self {
        self.berserk_override = berserk_override;
        self
    }

    #[must_use]
    pub fn with_region(mut self, region: Option<HighlightedRegion>) -> Self {
        self.region = region;
        self
    }

    #[must_use]
    pub fn with_already_selected(mut self, selected: BTreeSet<TokenId>) -> Self {
        self.already_selected = selected;
        self
    }

    /// Faction scope after the berserk override is applied.
    pub fn effective_scope(&self) -> FactionScope {
        match self.target_type.faction_scope() {
            FactionScope::Enemies if self.berserk_override => FactionScope::Any,
            scope => scope,
        }
    }

    /// Whether the source's own tokens are dropped.
    ///
    /// Enemies types ignore the user flag and only exclude the source under
    /// the berserk override. Other types honour the flag where offered.
    pub fn excludes_self(&self) -> bool {
        match self.target_type.faction_scope() {
            FactionScope::Enemies => self.berserk_override,
            _ => self.exclude_self && self.target_type.supports_exclude_self(),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Why a selection could not be computed.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SelectError {
    #[error("scene targeting requires a highlighted range")]
    NoHighlightedRegion,

    #[error("picked point ({x}, {y}) is outside the highlighted range")]
    AnchorOutOfRange { x: f64, y: f64 },

    #[error("{0} targeting requires a picked point")]
    MissingAnchor(TargetType),
}

impl AssistError for SelectError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AnchorOutOfRange { .. } => ErrorSeverity::Recoverable,
            Self::NoHighlightedRegion | Self::MissingAnchor(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoHighlightedRegion => "SELECT_NO_HIGHLIGHTED_REGION",
            Self::AnchorOutOfRange { .. } => "SELECT_ANCHOR_OUT_OF_RANGE",
            Self::MissingAnchor(_) => "SELECT_MISSING_ANCHOR",
        }
    }
}

// ============================================================================
// Selection
// ============================================================================

/// Computes the targets of `request` among `candidates`, in candidate order.
///
/// `TargetType::None` selects nothing.
pub fn select<'a, G>(
    request: &SelectionRequest,
    candidates: &'a [Candidate],
    grid: &G,
) -> Result<Vec<&'a Candidate>, SelectError>
where
    G: GridGeometry + ?Sized,
{
    if request.target_type.is_scene() {
        let region = request
            .region
            .as_ref()
            .ok_or(SelectError::NoHighlightedRegion)?;
        return Ok(region::select_in_region(request, region, candidates, grid));
    }

    let Some(footprint) = request.target_type.footprint() else {
        return Ok(Vec::new());
    };
    let anchor = request
        .anchor
        .ok_or(SelectError::MissingAnchor(request.target_type))?;

    if let Some(region) = &request.region
        && !region.contains_point(grid, anchor)
    {
        return Err(SelectError::AnchorOutOfRange {
            x: anchor.x,
            y: anchor.y,
        });
    }

    Ok(anchored::select_anchored(
        request, anchor, footprint, candidates, grid,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{GridCell, Size, SquareGrid};

    fn token(id: &str, actor: &str, x: f64, y: f64, faction: Faction) -> Candidate {
        Candidate::new(id, actor, Point::new(x, y), Size::square(100.0), faction)
    }

    fn ids(selected: &[&Candidate]) -> Vec<String> {
        selected.iter().map(|c| c.id.to_string()).collect()
    }

    fn scene() -> Vec<Candidate> {
        vec![
            token("pc", "hero", 0.0, 0.0, Faction::PlayerCharacter),
            token("ally", "friend", 100.0, 0.0, Faction::Ally),
            token("orc", "orc", 200.0, 0.0, Faction::Enemy),
            token("squad", "squad", 100.0, 100.0, Faction::Troop),
            token("crate", "crate", 300.0, 300.0, Faction::Unknown),
        ]
    }

    #[test]
    fn none_selects_nothing() {
        let grid = SquareGrid::new(100.0);
        let request = SelectionRequest::new(TargetType::None).with_anchor(Point::new(50.0, 50.0));
        let population = scene();
        assert!(select(&request, &population, &grid).unwrap().is_empty());
    }

    #[test]
    fn anchored_types_require_an_anchor() {
        let grid = SquareGrid::new(100.0);
        let request = SelectionRequest::new(TargetType::Single);
        assert_eq!(
            select(&request, &scene(), &grid),
            Err(SelectError::MissingAnchor(TargetType::Single))
        );
    }

    #[test]
    fn scene_without_region_fails_regardless_of_population() {
        let grid = SquareGrid::new(100.0);
        for target_type in [
            TargetType::Scene,
            TargetType::SceneEnemies,
            TargetType::SceneAllies,
        ] {
            let request = SelectionRequest::new(target_type).with_anchor(Point::new(50.0, 50.0));
            assert_eq!(
                select(&request, &scene(), &grid),
                Err(SelectError::NoHighlightedRegion)
            );
            assert_eq!(
                select(&request, &[], &grid),
                Err(SelectError::NoHighlightedRegion)
            );
        }
    }

    #[test]
    fn anchor_outside_region_is_rejected() {
        let grid = SquareGrid::new(100.0);
        let region = HighlightedRegion::from_cells([GridCell::new(0, 0)]);
        let request = SelectionRequest::new(TargetType::Single)
            .with_anchor(Point::new(250.0, 50.0))
            .with_region(Some(region));
        let error = select(&request, &scene(), &grid).unwrap_err();
        assert!(error.severity().is_recoverable());
    }

    #[test]
    fn area_enemies_from_pc_hits_npc_side_only() {
        let grid = SquareGrid::new(100.0);
        let request = SelectionRequest::new(TargetType::AreaEnemies)
            .with_anchor(Point::new(150.0, 50.0))
            .with_source(Some(ActorId::new("hero")), Faction::PlayerCharacter);
        let population = scene();
        let selected = select(&request, &population, &grid).unwrap();
        assert_eq!(ids(&selected), vec!["orc", "squad"]);
    }

    #[test]
    fn berserk_override_hits_everyone_but_self() {
        let grid = SquareGrid::new(100.0);
        let request = SelectionRequest::new(TargetType::AreaEnemies)
            .with_anchor(Point::new(150.0, 50.0))
            .with_source(Some(ActorId::new("hero")), Faction::PlayerCharacter)
            .with_berserk_override(true);
        let population = scene();
        let selected = select(&request, &population, &grid).unwrap();
        assert_eq!(ids(&selected), vec!["ally", "orc", "squad"]);
    }

    #[test]
    fn enemies_ignore_the_exclude_self_flag() {
        let request = SelectionRequest::new(TargetType::SceneEnemies).with_exclude_self(true);
        assert!(!request.excludes_self());
        assert!(request.clone().with_berserk_override(true).excludes_self());

        let single = SelectionRequest::new(TargetType::Single).with_exclude_self(true);
        assert!(!single.excludes_self());
        let allies = SelectionRequest::new(TargetType::AreaAllies).with_exclude_self(true);
        assert!(allies.excludes_self());
    }

    #[test]
    fn area_allies_can_exclude_self() {
        let grid = SquareGrid::new(100.0);
        let request = SelectionRequest::new(TargetType::AreaAllies)
            .with_anchor(Point::new(100.0, 50.0))
            .with_source(Some(ActorId::new("hero")), Faction::PlayerCharacter)
            .with_exclude_self(true);
        let population = scene();
        let selected = select(&request, &population, &grid).unwrap();
        assert_eq!(ids(&selected), vec!["ally"]);
    }

    #[test]
    fn scene_selects_centers_inside_region() {
        let grid = SquareGrid::new(100.0);
        let region = HighlightedRegion::from_cells([
            GridCell::new(0, 0),
            GridCell::new(0, 1),
            GridCell::new(0, 2),
        ]);
        let request = SelectionRequest::new(TargetType::SceneAllies)
            .with_source(Some(ActorId::new("orc")), Faction::Enemy)
            .with_region(Some(region));
        let population = scene();
        let selected = select(&request, &population, &grid).unwrap();
        assert_eq!(ids(&selected), vec!["orc"]);
    }
}
