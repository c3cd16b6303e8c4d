//! Pick loops for each family of target types.
//!
//! - anchored (Single, Area*): one pick, retried until something matches
//! - N: 1×1 picks accumulated until N tokens are targeted
//! - scene (Scene*): no pick, everything inside the range highlight
use assist_core::{
    Candidate, Footprint, NTargetProgress, NValue, Point, SelectError, SelectionRequest, TokenId,
};

use crate::api::{CrosshairPrompt, DEFAULT_MARKER_ASSET, MarkerSpec, Result, RuntimeError};

use super::session::SelectionLock;
use super::{TargetingAssistant, TargetingOutcome};

impl TargetingAssistant {
    pub(super) async fn run_anchored(&self, request: SelectionRequest) -> Result<TargetingOutcome> {
        let target_type = request.target_type;
        let footprint = target_type
            .footprint()
            .ok_or(RuntimeError::Selection(SelectError::MissingAnchor(target_type)))?;
        let candidates = self.scene.tokens();
        let prompt = self.prompt(footprint, String::new());

        loop {
            let Some(anchor) = self.pick(&prompt).await? else {
                tracing::info!(target_type = %target_type, "Targeting cancelled");
                return Ok(TargetingOutcome::cancelled(target_type, Vec::new()));
            };

            let targeted = match self.matches(&request.clone().with_anchor(anchor), &candidates) {
                Ok(targeted) => targeted,
                Err(SelectError::AnchorOutOfRange { .. }) => {
                    self.out_of_range(anchor);
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            if targeted.is_empty() {
                tracing::debug!(x = anchor.x, y = anchor.y, "No eligible token under the crosshair");
                continue;
            }

            self.show_marker(anchor, &prompt.marker).await?;
            self.apply_targets(&targeted);
            return Ok(TargetingOutcome::completed(target_type, targeted));
        }
    }

    pub(super) async fn run_n(
        &self,
        base: SelectionRequest,
        n: NValue,
    ) -> Result<TargetingOutcome> {
        let target_type = base.target_type;
        let candidates = self.scene.tokens();
        let mut progress = NTargetProgress::new(n);

        while !progress.is_complete() {
            let prompt = self.prompt(Footprint::Single, progress.label());
            let Some(anchor) = self.pick(&prompt).await? else {
                tracing::info!(
                    selected = progress.selected_count(),
                    target = n.get(),
                    "N targeting cancelled"
                );
                return Ok(TargetingOutcome::cancelled(
                    target_type,
                    progress.selected().to_vec(),
                ));
            };

            let request = progress.prepare(base.clone().with_anchor(anchor));
            let picked = assist_core::select(&request, &candidates, self.scene.grid())
                .map(|matches| progress.apply(matches));
            let added = match picked {
                Ok(added) => added,
                Err(SelectError::AnchorOutOfRange { .. }) => {
                    self.out_of_range(anchor);
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            if added.is_empty() {
                tracing::debug!(x = anchor.x, y = anchor.y, "Pick added no new target");
                continue;
            }

            self.show_marker(anchor, &prompt.marker).await?;
            self.apply_targets(&added);
            tracing::debug!(progress = %progress.label(), "N targeting progress");
        }

        Ok(TargetingOutcome::completed(
            target_type,
            progress.selected().to_vec(),
        ))
    }

    pub(super) fn run_scene(&self, request: SelectionRequest) -> Result<TargetingOutcome> {
        let candidates = self.scene.tokens();
        let targeted = self.matches(&request, &candidates)?;
        self.apply_targets(&targeted);
        Ok(TargetingOutcome::completed(request.target_type, targeted))
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn prompt(&self, footprint: Footprint, label: String) -> CrosshairPrompt {
        let cell = self.scene.grid().cell_size();
        CrosshairPrompt {
            footprint,
            label,
            marker: MarkerSpec {
                asset: self.settings.crosshair_image.clone(),
                size: footprint.side(cell) * self.settings.crosshair_scale,
                alpha: self.settings.crosshair_alpha,
            },
        }
    }

    /// Awaits one pick with the selection lock held.
    async fn pick(&self, prompt: &CrosshairPrompt) -> Result<Option<Point>> {
        let _lock = SelectionLock::engage(self.scene.as_ref());
        tracing::debug!(footprint = ?prompt.footprint, label = %prompt.label, "Awaiting pick");
        self.picker.pick(prompt).await.map_err(RuntimeError::Picker)
    }

    fn matches(
        &self,
        request: &SelectionRequest,
        candidates: &[Candidate],
    ) -> std::result::Result<Vec<TokenId>, SelectError> {
        let selected = assist_core::select(request, candidates, self.scene.grid())?;
        Ok(selected.into_iter().map(|c| c.id.clone()).collect())
    }

    fn apply_targets(&self, tokens: &[TokenId]) {
        for token in tokens {
            self.scene.set_target(token, true);
        }
    }

    fn out_of_range(&self, anchor: Point) {
        tracing::debug!(x = anchor.x, y = anchor.y, "Pick outside the range highlight");
        self.notifier
            .warn("The picked point is outside the highlighted range.");
    }

    /// Draws the marker, falling back to the built-in asset once.
    async fn show_marker(&self, anchor: Point, marker: &MarkerSpec) -> Result<()> {
        match self.renderer.show_marker(anchor, marker).await {
            Ok(()) => Ok(()),
            Err(err) if marker.asset != DEFAULT_MARKER_ASSET => {
                tracing::warn!("Crosshair image failed, using default marker: {}", err);
                let fallback = MarkerSpec {
                    asset: DEFAULT_MARKER_ASSET.to_string(),
                    ..marker.clone()
                };
                self.renderer
                    .show_marker(anchor, &fallback)
                    .await
                    .map_err(RuntimeError::Renderer)
            }
            Err(err) => Err(RuntimeError::Renderer(err)),
        }
    }
}
