//! Host-facing seams of the targeting runtime.
//!
//! The assistant never touches a canvas directly. Everything it needs from
//! the host (the scene, the crosshair, visual effects, user notifications,
//! and the item/actor sheets) arrives through the traits below, so the same
//! flows run against a live tabletop, the CLI fixture scene, or scripted
//! test doubles.
mod errors;

pub use errors::{PickerError, RenderError, Result, RuntimeError};

use async_trait::async_trait;

use assist_core::{ActorId, Candidate, Footprint, GridGeometry, Point, TokenId};

use crate::highlight::HighlightEntry;
use crate::records::{ActorRecord, ItemId, ItemRecord};

// ============================================================================
// Scene
// ============================================================================

/// Live canvas state: tokens, control, targets, and readiness.
///
/// Methods take `&self`; implementations use interior mutability because
/// the host shares the scene with everything else running on it.
pub trait Scene: Send + Sync {
    /// Whether the canvas finished loading and accepts input.
    fn is_ready(&self) -> bool;

    /// Whether a combat encounter is running.
    fn combat_started(&self) -> bool;

    fn grid(&self) -> &dyn GridGeometry;

    /// Every token currently placed on the canvas.
    fn tokens(&self) -> Vec<Candidate>;

    /// Tokens the user currently controls, in control order.
    fn controlled(&self) -> Vec<TokenId>;

    /// Takes control of `token`; with `release_others` every other
    /// controlled token is released first.
    fn control(&self, token: &TokenId, release_others: bool);

    /// Tokens the user currently targets.
    fn targets(&self) -> Vec<TokenId>;

    fn set_target(&self, token: &TokenId, targeted: bool);

    /// Blocks ordinary token selection while a crosshair is on screen.
    fn set_selection_lock(&self, locked: bool);
}

// ============================================================================
// Range Highlights
// ============================================================================

/// Read-only view over the range highlights queued by the host.
pub trait RangeHighlights: Send + Sync {
    /// Highlight queued for `actor` or its `token`, if any.
    fn queued(&self, actor: &ActorId, token: &TokenId) -> Option<HighlightEntry>;

    /// Pixel centers of every cell reachable from `source` within `range`.
    fn reachable(&self, source: &Candidate, range: u32, grid: &dyn GridGeometry) -> Vec<Point>;
}

// ============================================================================
// Crosshair
// ============================================================================

/// Marker drawn at a picked anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerSpec {
    pub asset: String,
    /// Side length in pixels.
    pub size: f64,
    pub alpha: f64,
}

/// What the crosshair shows while the user picks a point.
#[derive(Clone, Debug, PartialEq)]
pub struct CrosshairPrompt {
    pub footprint: Footprint,
    /// `"{selected}/{n}"` in N mode, empty otherwise.
    pub label: String,
    pub marker: MarkerSpec,
}

/// Interactive point picker.
#[async_trait]
pub trait CrosshairPicker: Send + Sync {
    /// Waits for the user to pick a point; `Ok(None)` means cancelled.
    async fn pick(&self, prompt: &CrosshairPrompt) -> std::result::Result<Option<Point>, PickerError>;
}

// ============================================================================
// Effects
// ============================================================================

/// Asset used when the configured crosshair image cannot be rendered.
pub const DEFAULT_MARKER_ASSET: &str = "icons/svg/target.svg";

#[async_trait]
pub trait EffectsRenderer: Send + Sync {
    /// Displays a transient marker at `anchor`.
    async fn show_marker(
        &self,
        anchor: Point,
        marker: &MarkerSpec,
    ) -> std::result::Result<(), RenderError>;
}

/// Renderer that draws nothing.
pub struct NoopRenderer;

#[async_trait]
impl EffectsRenderer for NoopRenderer {
    async fn show_marker(
        &self,
        _anchor: Point,
        _marker: &MarkerSpec,
    ) -> std::result::Result<(), RenderError> {
        Ok(())
    }
}

// ============================================================================
// Notifications
// ============================================================================

/// User-visible notifications.
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Notifier that only forwards to `tracing`.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn info(&self, message: &str) {
        tracing::info!(target: "assist::notify", "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "assist::notify", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "assist::notify", "{}", message);
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Lookup of item and actor sheets.
pub trait Catalog: Send + Sync {
    fn item(&self, id: &ItemId) -> Option<ItemRecord>;

    fn actor(&self, id: &ActorId) -> Option<ActorRecord>;

    /// Actor owning `item`, for items embedded in a sheet.
    fn owner_of(&self, item: &ItemId) -> Option<ActorId>;
}
