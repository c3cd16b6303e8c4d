//! In-memory scene and catalog built from a JSON fixture.
//!
//! The CLI drives the assistant against these, and integration tests use
//! them as scene doubles. A fixture is a snapshot of one canvas: grid,
//! tokens, control and target state, the sheets behind the tokens, and the
//! queued range highlights.
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use assist_core::{ActorId, Candidate, GridGeometry, SquareGrid, TokenId};

use crate::api::{Catalog, Scene};
use crate::highlight::{HighlightEntry, StaticRangeHighlights};
use crate::records::{ActorRecord, ItemId, ItemRecord};

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneFixture {
    #[serde(default)]
    pub grid: SquareGrid,
    #[serde(default = "default_true")]
    pub ready: bool,
    #[serde(default)]
    pub combat_started: bool,
    #[serde(default)]
    pub tokens: Vec<Candidate>,
    #[serde(default)]
    pub controlled: Vec<TokenId>,
    #[serde(default)]
    pub targets: Vec<TokenId>,
    #[serde(default)]
    pub actors: Vec<ActorRecord>,
    #[serde(default)]
    pub items: Vec<ItemRecord>,
    #[serde(default)]
    pub highlights: Vec<HighlightEntry>,
}

impl SceneFixture {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn scene(&self) -> MemoryScene {
        let scene = MemoryScene::new(self.grid, self.tokens.clone())
            .with_combat(self.combat_started)
            .with_controlled(self.controlled.clone())
            .with_targets(self.targets.clone());
        if self.ready { scene } else { scene.never_ready() }
    }

    pub fn catalog(&self) -> MemoryCatalog {
        MemoryCatalog::new(self.actors.clone(), self.items.clone())
    }

    pub fn highlights(&self) -> StaticRangeHighlights {
        StaticRangeHighlights::new(self.highlights.clone())
    }
}

// ============================================================================
// Scene
// ============================================================================

#[derive(Debug, Default)]
struct SceneState {
    tokens: Vec<Candidate>,
    controlled: Vec<TokenId>,
    targets: Vec<TokenId>,
    locked: bool,
    lock_toggles: usize,
    /// Polls left before the canvas reports ready; `None` never becomes ready.
    polls_until_ready: Option<u32>,
    combat_started: bool,
}

pub struct MemoryScene {
    grid: SquareGrid,
    state: Mutex<SceneState>,
}

impl MemoryScene {
    pub fn new(grid: SquareGrid, tokens: Vec<Candidate>) -> Self {
        Self {
            grid,
            state: Mutex::new(SceneState {
                tokens,
                polls_until_ready: Some(0),
                ..SceneState::default()
            }),
        }
    }

    #[must_use]
    pub fn with_combat(self, started: bool) -> Self {
        self.state().combat_started = started;
        self
    }

    #[must_use]
    pub fn with_controlled(self, controlled: Vec<TokenId>) -> Self {
        self.state().controlled = controlled;
        self
    }

    #[must_use]
    pub fn with_targets(self, targets: Vec<TokenId>) -> Self {
        self.state().targets = targets;
        self
    }

    /// Reports not-ready for the first `polls` readiness checks.
    #[must_use]
    pub fn ready_after(self, polls: u32) -> Self {
        self.state().polls_until_ready = Some(polls);
        self
    }

    #[must_use]
    pub fn never_ready(self) -> Self {
        self.state().polls_until_ready = None;
        self
    }

    pub fn is_locked(&self) -> bool {
        self.state().locked
    }

    /// Number of times the selection lock was switched on or off.
    pub fn lock_toggles(&self) -> usize {
        self.state().lock_toggles
    }

    fn state(&self) -> MutexGuard<'_, SceneState> {
        // A panicking test double must not poison the scene for the next assertion.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Scene for MemoryScene {
    fn is_ready(&self) -> bool {
        let mut state = self.state();
        match state.polls_until_ready {
            Some(0) => true,
            Some(n) => {
                state.polls_until_ready = Some(n - 1);
                false
            }
            None => false,
        }
    }

    fn combat_started(&self) -> bool {
        self.state().combat_started
    }

    fn grid(&self) -> &dyn GridGeometry {
        &self.grid
    }

    fn tokens(&self) -> Vec<Candidate> {
        self.state().tokens.clone()
    }

    fn controlled(&self) -> Vec<TokenId> {
        self.state().controlled.clone()
    }

    fn control(&self, token: &TokenId, release_others: bool) {
        let mut state = self.state();
        if release_others {
            state.controlled.clear();
        }
        if !state.controlled.contains(token) {
            state.controlled.push(token.clone());
        }
    }

    fn targets(&self) -> Vec<TokenId> {
        self.state().targets.clone()
    }

    fn set_target(&self, token: &TokenId, targeted: bool) {
        let mut state = self.state();
        if targeted {
            if !state.targets.contains(token) {
                state.targets.push(token.clone());
            }
        } else {
            state.targets.retain(|t| t != token);
        }
    }

    fn set_selection_lock(&self, locked: bool) {
        let mut state = self.state();
        if state.locked != locked {
            state.locked = locked;
            state.lock_toggles += 1;
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct MemoryCatalog {
    actors: HashMap<ActorId, ActorRecord>,
    items: HashMap<ItemId, ItemRecord>,
}

impl MemoryCatalog {
    pub fn new(actors: Vec<ActorRecord>, items: Vec<ItemRecord>) -> Self {
        Self {
            actors: actors.into_iter().map(|a| (a.id.clone(), a)).collect(),
            items: items.into_iter().map(|i| (i.id.clone(), i)).collect(),
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemRecord> {
        self.items.values()
    }
}

impl Catalog for MemoryCatalog {
    fn item(&self, id: &ItemId) -> Option<ItemRecord> {
        self.items.get(id).cloned()
    }

    fn actor(&self, id: &ActorId) -> Option<ActorRecord> {
        self.actors.get(id).cloned()
    }

    fn owner_of(&self, item: &ItemId) -> Option<ActorId> {
        let mut owners: Vec<&ActorRecord> =
            self.actors.values().filter(|actor| actor.owns(item)).collect();
        owners.sort_by(|a, b| a.id.cmp(&b.id));
        owners.first().map(|actor| actor.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "grid": { "size": 50 },
        "combatStarted": true,
        "tokens": [
            { "id": "t1", "actor": "a1", "position": { "x": 0, "y": 0 },
              "size": { "width": 50, "height": 50 }, "faction": "PlayerCharacter" }
        ],
        "controlled": ["t1"],
        "actors": [{ "id": "a1", "name": "Hero", "faction": "PlayerCharacter", "items": ["i1"] }],
        "items": [{ "id": "i1", "name": "Blast", "type": "effect" }],
        "highlights": [{ "actorId": "a1", "range": 2 }]
    }"#;

    #[test]
    fn fixture_builds_collaborators() {
        let fixture = SceneFixture::from_json(FIXTURE).unwrap();
        assert!(fixture.ready);

        let scene = fixture.scene();
        assert!(scene.is_ready());
        assert!(scene.combat_started());
        assert_eq!(scene.grid().cell_size(), 50.0);
        assert_eq!(scene.controlled(), vec![TokenId::new("t1")]);

        let catalog = fixture.catalog();
        assert_eq!(catalog.owner_of(&ItemId::new("i1")), Some(ActorId::new("a1")));
        assert_eq!(fixture.highlights().entries().len(), 1);
    }

    #[test]
    fn readiness_counts_down() {
        let scene = MemoryScene::new(SquareGrid::default(), Vec::new()).ready_after(2);
        assert!(!scene.is_ready());
        assert!(!scene.is_ready());
        assert!(scene.is_ready());
    }

    #[test]
    fn exclusive_control_releases_others() {
        let scene = MemoryScene::new(SquareGrid::default(), Vec::new())
            .with_controlled(vec![TokenId::new("a"), TokenId::new("b")]);
        scene.control(&TokenId::new("c"), true);
        assert_eq!(scene.controlled(), vec![TokenId::new("c")]);
        scene.control(&TokenId::new("a"), false);
        assert_eq!(scene.controlled().len(), 2);
    }
}
