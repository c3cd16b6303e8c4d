//! Per-invocation bookkeeping: the acting source and the scene guards.
use assist_core::{ActorId, Candidate, TokenId};

use crate::api::{Result, RuntimeError, Scene};
use crate::records::ActorRecord;

use super::TargetingAssistant;

/// The token acting for an invocation and the sheet behind it.
#[derive(Clone, Debug)]
pub(super) struct Source {
    pub token: Candidate,
    pub actor: ActorRecord,
    /// Invoked from an item use rather than by hand.
    pub item_triggered: bool,
}

impl TargetingAssistant {
    /// Picks the acting token.
    ///
    /// With an actor the actor's first token is taken under exclusive
    /// control. Without one the first controlled token acts, and its actor
    /// must be known to the catalog.
    pub(super) fn resolve_source(&self, actor: Option<&ActorId>) -> Result<Source> {
        let tokens = self.scene.tokens();

        match actor {
            Some(actor_id) => {
                let actor = self
                    .catalog
                    .actor(actor_id)
                    .ok_or_else(|| RuntimeError::ActorNotFound(actor_id.clone()))?;
                let token = tokens
                    .into_iter()
                    .find(|token| token.is_owned_by(actor_id))
                    .ok_or_else(|| RuntimeError::ActorHasNoToken(actor_id.clone()))?;
                self.scene.control(&token.id, true);
                tracing::debug!(token = %token.id, actor = %actor.id, "Controlling source token");
                Ok(Source {
                    token,
                    actor,
                    item_triggered: true,
                })
            }
            None => {
                let controlled = self.scene.controlled();
                let first = controlled.first().ok_or(RuntimeError::NoControlledToken)?;
                let token = tokens
                    .into_iter()
                    .find(|token| &token.id == first)
                    .ok_or(RuntimeError::NoControlledToken)?;
                let actor_id = token
                    .actor
                    .clone()
                    .ok_or(RuntimeError::NoControlledToken)?;
                let actor = self
                    .catalog
                    .actor(&actor_id)
                    .ok_or(RuntimeError::ActorNotFound(actor_id))?;
                Ok(Source {
                    token,
                    actor,
                    item_triggered: false,
                })
            }
        }
    }

    /// Untargets everything the user currently targets.
    pub(super) fn clear_targets(&self) {
        for token in self.scene.targets() {
            self.scene.set_target(&token, false);
        }
    }
}

// ============================================================================
// Guards
// ============================================================================

/// Holds the scene's selection lock for as long as it lives.
pub(super) struct SelectionLock<'a> {
    scene: &'a dyn Scene,
}

impl<'a> SelectionLock<'a> {
    pub fn engage(scene: &'a dyn Scene) -> Self {
        scene.set_selection_lock(true);
        Self { scene }
    }
}

impl Drop for SelectionLock<'_> {
    fn drop(&mut self) {
        self.scene.set_selection_lock(false);
    }
}

/// Restores the controlled-token set captured at creation when dropped.
pub(super) struct ControlRestore<'a> {
    scene: &'a dyn Scene,
    saved: Vec<TokenId>,
}

impl<'a> ControlRestore<'a> {
    pub fn capture(scene: &'a dyn Scene) -> Self {
        Self {
            saved: scene.controlled(),
            scene,
        }
    }
}

impl Drop for ControlRestore<'_> {
    fn drop(&mut self) {
        for (index, token) in self.saved.iter().enumerate() {
            self.scene.control(token, index == 0);
        }
    }
}
