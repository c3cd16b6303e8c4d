//! Targeting assistant orchestrator.
//!
//! [`TargetingAssistant`] owns the host collaborators and runs one
//! invocation at a time: gate on combat, wait for the canvas, resolve the
//! acting token, clear old targets, then hand off to the flow for the
//! item's [`TargetType`]. Every exit path releases the selection lock and
//! restores the controlled tokens through RAII guards.
mod flows;
mod session;

use std::sync::Arc;

use assist_core::{
    ActorId, AssistError, HighlightedRegion, SelectionRequest, TargetType, TargetingConfig,
    TargetingForm, TokenId, faction,
};

use crate::api::{
    Catalog, CrosshairPicker, EffectsRenderer, NoopRenderer, Notifier, RangeHighlights, Result,
    RuntimeError, Scene, TracingNotifier,
};
use crate::highlight::StaticRangeHighlights;
use crate::records::{self, ItemId, ItemRecord};
use crate::settings::AssistSettings;
use crate::store::{ConfigStore, InMemoryConfigStore};

use session::{ControlRestore, Source};

// ============================================================================
// Outcome
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// The flow ran to the end and committed its targets.
    Completed,
    /// The user dismissed the crosshair. N mode keeps what it already took.
    Cancelled,
    /// The item has targeting switched off.
    Skipped,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetingOutcome {
    pub target_type: TargetType,
    pub status: OutcomeStatus,
    /// Tokens targeted by this invocation, in the order they were added.
    pub targeted: Vec<TokenId>,
}

impl TargetingOutcome {
    fn completed(target_type: TargetType, targeted: Vec<TokenId>) -> Self {
        Self {
            target_type,
            status: OutcomeStatus::Completed,
            targeted,
        }
    }

    fn cancelled(target_type: TargetType, targeted: Vec<TokenId>) -> Self {
        Self {
            target_type,
            status: OutcomeStatus::Cancelled,
            targeted,
        }
    }

    fn skipped(target_type: TargetType) -> Self {
        Self {
            target_type,
            status: OutcomeStatus::Skipped,
            targeted: Vec::new(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == OutcomeStatus::Completed
    }
}

// ============================================================================
// Assistant
// ============================================================================

pub struct TargetingAssistant {
    scene: Arc<dyn Scene>,
    catalog: Arc<dyn Catalog>,
    store: Arc<dyn ConfigStore>,
    picker: Arc<dyn CrosshairPicker>,
    renderer: Arc<dyn EffectsRenderer>,
    highlights: Arc<dyn RangeHighlights>,
    notifier: Arc<dyn Notifier>,
    settings: AssistSettings,
}

impl TargetingAssistant {
    pub fn builder() -> TargetingAssistantBuilder {
        TargetingAssistantBuilder::default()
    }

    pub fn settings(&self) -> &AssistSettings {
        &self.settings
    }

    pub fn store(&self) -> &dyn ConfigStore {
        self.store.as_ref()
    }

    /// Builds a config for `item` from a confirmed form and saves it.
    ///
    /// N expressions resolve against the item's own level, or for combos
    /// against the constituents owned by `actor` (defaulting to the item's
    /// owner). An invalid N is reported and nothing is saved.
    pub fn configure(
        &self,
        item_id: &ItemId,
        form: TargetingForm,
        actor: Option<&ActorId>,
    ) -> Result<TargetingConfig> {
        let item = self.item(item_id).map_err(|err| self.report(err))?;

        let owner_id = actor.cloned().or_else(|| self.catalog.owner_of(item_id));
        let owner = owner_id.as_ref().and_then(|id| self.catalog.actor(id));
        let ctx = records::resolution_context(&item, owner.as_ref(), |id| self.catalog.item(id));

        let config =
            TargetingConfig::build(form, &ctx).map_err(|err| self.report(err.into()))?;
        self.store
            .save(item_id, &config)
            .map_err(|err| self.report(err.into()))?;

        tracing::info!(
            item = %item.id,
            target_type = %config.target_type,
            n = ?config.resolved_n.map(|n| n.get()),
            "Saved targeting config"
        );
        Ok(config)
    }

    /// Runs the saved targeting flow of `item_id`.
    ///
    /// `actor` is set when the invocation comes from an item use; range
    /// highlights, self-exclusion and the berserk override only apply then.
    pub async fn invoke(
        &self,
        item_id: &ItemId,
        actor: Option<&ActorId>,
    ) -> Result<TargetingOutcome> {
        let outcome = self
            .run(item_id, actor)
            .await
            .map_err(|err| self.report(err))?;
        tracing::info!(
            item = %item_id,
            status = ?outcome.status,
            targeted = outcome.targeted.len(),
            "Targeting finished"
        );
        Ok(outcome)
    }

    /// Reacts to an item being used from a chat card.
    ///
    /// `display_name` may carry a leading `[tag]` and the item's ruby.
    /// Returns `Ok(None)` when nothing matches, the item has no enabled
    /// and valid config, or combat gating silently applies.
    pub async fn on_item_used(
        &self,
        actor_id: &ActorId,
        display_name: &str,
    ) -> Result<Option<TargetingOutcome>> {
        let name = strip_tag(display_name);

        let Some(actor) = self.catalog.actor(actor_id) else {
            tracing::debug!(actor = %actor_id, "Item use from unknown actor");
            return Ok(None);
        };
        let Some(item) = actor
            .items
            .iter()
            .filter_map(|id| self.catalog.item(id))
            .find(|item| item.kind.is_targetable() && item.answers_to(name))
        else {
            tracing::debug!(actor = %actor_id, name, "No targetable item matches");
            return Ok(None);
        };

        let Some(config) = self.store.load(&item.id)? else {
            return Ok(None);
        };
        if !config.is_enabled() {
            return Ok(None);
        }
        if let Err(err) = config.validate() {
            tracing::debug!(item = %item.id, %err, "Ignoring unusable targeting config");
            return Ok(None);
        }
        if self.settings.only_in_combat && !self.scene.combat_started() {
            tracing::debug!(item = %item.id, "Skipping item use outside combat");
            return Ok(None);
        }

        self.invoke(&item.id, Some(actor_id)).await.map(Some)
    }

    async fn run(&self, item_id: &ItemId, actor: Option<&ActorId>) -> Result<TargetingOutcome> {
        let item = self.item(item_id)?;
        let config = self
            .store
            .load(item_id)?
            .ok_or_else(|| RuntimeError::NotConfigured(item_id.clone()))?;
        config.validate()?;

        if !config.is_enabled() {
            return Ok(TargetingOutcome::skipped(config.target_type));
        }

        tracing::info!(item = %item.id, target_type = %config.target_type, "Starting targeting");

        if self.settings.only_in_combat && !self.scene.combat_started() {
            return Err(RuntimeError::CombatRequired);
        }

        self.wait_until_ready().await?;

        let _restore = ControlRestore::capture(self.scene.as_ref());
        let source = self.resolve_source(actor)?;
        self.clear_targets();

        let request = self.base_request(&config, &item, &source);
        match config.target_type {
            TargetType::None => Ok(TargetingOutcome::skipped(config.target_type)),
            TargetType::N => {
                let n = config
                    .resolved_n
                    .ok_or(assist_core::ConfigError::MissingCount)?;
                self.run_n(request, n).await
            }
            kind if kind.is_scene() => self.run_scene(request),
            _ => self.run_anchored(request).await,
        }
    }

    fn item(&self, id: &ItemId) -> Result<ItemRecord> {
        self.catalog
            .item(id)
            .ok_or_else(|| RuntimeError::ItemNotFound(id.clone()))
    }

    /// Selection request shared by every pick of one invocation.
    fn base_request(
        &self,
        config: &TargetingConfig,
        item: &ItemRecord,
        source: &Source,
    ) -> SelectionRequest {
        let request = SelectionRequest::from_config(config);
        if !source.item_triggered {
            return request.with_source(None, source.actor.faction);
        }

        let berserk = faction::berserk_override(
            item.attack_roll.as_deref(),
            source.actor.conditions.berserk.as_ref(),
        );
        if berserk {
            tracing::debug!(actor = %source.actor.id, "Berserk override widens enemy scope");
        }

        request
            .with_source(Some(source.actor.id.clone()), source.actor.faction)
            .with_berserk_override(berserk)
            .with_region(self.highlight_region(source))
    }

    /// Region highlighted for the source, if the host queued one.
    fn highlight_region(&self, source: &Source) -> Option<HighlightedRegion> {
        let entry = self.highlights.queued(&source.actor.id, &source.token.id)?;
        let grid = self.scene.grid();
        let points = self
            .highlights
            .reachable(&source.token, entry.effective_range(), grid);
        let region = HighlightedRegion::from_points(grid, points);
        tracing::debug!(
            token = %source.token.id,
            range = entry.effective_range(),
            cells = region.len(),
            "Range highlight"
        );
        Some(region)
    }

    async fn wait_until_ready(&self) -> Result<()> {
        let attempts = self.settings.ready_poll_attempts.max(1);
        for attempt in 1..=attempts {
            if self.scene.is_ready() {
                tracing::debug!(attempt, "Canvas ready");
                tokio::time::sleep(self.settings.highlight_settle_delay).await;
                return Ok(());
            }
            tokio::time::sleep(self.settings.ready_poll_interval).await;
        }
        Err(RuntimeError::SurfaceNotReady { attempts })
    }

    /// Shows `err` to the user and logs it, then hands it back.
    fn report(&self, err: RuntimeError) -> RuntimeError {
        let message = err.to_string();
        if err.severity().is_recoverable() {
            self.notifier.warn(&message);
        } else {
            self.notifier.error(&message);
        }
        tracing::warn!(code = err.error_code(), "Targeting aborted: {}", message);
        err
    }
}

/// Drops a leading `[...]` tag from a chat-card item name.
fn strip_tag(display_name: &str) -> &str {
    let trimmed = display_name.trim();
    if let Some(rest) = trimmed.strip_prefix('[')
        && let Some(end) = rest.find(']')
    {
        return rest[end + 1..].trim();
    }
    trimmed
}

// ============================================================================
// Builder
// ============================================================================

/// Wires collaborators into a [`TargetingAssistant`].
///
/// A scene, a catalog and a picker are required. The rest default to an
/// in-memory store, a renderer that draws nothing, no range highlights, a
/// tracing-only notifier, and default settings.
#[derive(Default)]
pub struct TargetingAssistantBuilder {
    scene: Option<Arc<dyn Scene>>,
    catalog: Option<Arc<dyn Catalog>>,
    store: Option<Arc<dyn ConfigStore>>,
    picker: Option<Arc<dyn CrosshairPicker>>,
    renderer: Option<Arc<dyn EffectsRenderer>>,
    highlights: Option<Arc<dyn RangeHighlights>>,
    notifier: Option<Arc<dyn Notifier>>,
    settings: AssistSettings,
}

impl TargetingAssistantBuilder {
    pub fn scene(mut self, scene: Arc<dyn Scene>) -> Self {
        self.scene = Some(scene);
        self
    }

    pub fn catalog(mut self, catalog: Arc<dyn Catalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn store(mut self, store: Arc<dyn ConfigStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn picker(mut self, picker: Arc<dyn CrosshairPicker>) -> Self {
        self.picker = Some(picker);
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn EffectsRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn highlights(mut self, highlights: Arc<dyn RangeHighlights>) -> Self {
        self.highlights = Some(highlights);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn settings(mut self, settings: AssistSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> Result<TargetingAssistant> {
        Ok(TargetingAssistant {
            scene: self.scene.ok_or(RuntimeError::MissingCollaborator("scene"))?,
            catalog: self
                .catalog
                .ok_or(RuntimeError::MissingCollaborator("catalog"))?,
            picker: self
                .picker
                .ok_or(RuntimeError::MissingCollaborator("crosshair picker"))?,
            store: self
                .store
                .unwrap_or_else(|| Arc::new(InMemoryConfigStore::new())),
            renderer: self.renderer.unwrap_or_else(|| Arc::new(NoopRenderer)),
            highlights: self
                .highlights
                .unwrap_or_else(|| Arc::new(StaticRangeHighlights::default())),
            notifier: self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier)),
            settings: self.settings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_tags_are_stripped() {
        assert_eq!(strip_tag("[Minor] Fireball"), "Fireball");
        assert_eq!(strip_tag("  Fireball "), "Fireball");
        assert_eq!(strip_tag("[unterminated Fireball"), "[unterminated Fireball");
        assert_eq!(strip_tag("Fire [ball]"), "Fire [ball]");
    }

    #[test]
    fn outcome_constructors_set_status() {
        assert!(TargetingOutcome::completed(TargetType::Single, Vec::new()).is_completed());
        assert_eq!(
            TargetingOutcome::skipped(TargetType::None).status,
            OutcomeStatus::Skipped
        );
    }
}
