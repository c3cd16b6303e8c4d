//! Scripted collaborators and a shared battlefield for runtime tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use assist_core::{
    BerserkState, Candidate, Faction, ItemKind, LevelValue, Point, Size, SquareGrid, TokenId,
};
use assist_runtime::{
    ActorRecord, AssistSettings, CrosshairPicker, CrosshairPrompt, EffectsRenderer,
    HighlightEntry, ItemRecord, MarkerSpec, MemoryCatalog, MemoryScene, Notifier, PickerError,
    RenderError, StaticRangeHighlights, TargetingAssistant,
};

// ============================================================================
// Picker
// ============================================================================

type Pick = Result<Option<Point>, PickerError>;

/// Replays queued picks and records every prompt it was shown.
///
/// Cancels once the script runs out.
#[derive(Default)]
pub struct ScriptedPicker {
    script: Mutex<VecDeque<Pick>>,
    prompts: Mutex<Vec<CrosshairPrompt>>,
}

impl ScriptedPicker {
    pub fn new(points: impl IntoIterator<Item = Option<(f64, f64)>>) -> Self {
        let script = points
            .into_iter()
            .map(|p| Ok(p.map(|(x, y)| Point::new(x, y))))
            .collect();
        Self {
            script: Mutex::new(script),
            prompts: Mutex::default(),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::from([Err(PickerError::new(message))])),
            prompts: Mutex::default(),
        }
    }

    pub fn prompts(&self) -> Vec<CrosshairPrompt> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn labels(&self) -> Vec<String> {
        self.prompts().into_iter().map(|p| p.label).collect()
    }
}

#[async_trait]
impl CrosshairPicker for ScriptedPicker {
    async fn pick(&self, prompt: &CrosshairPrompt) -> Result<Option<Point>, PickerError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.script.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }
}

// ============================================================================
// Notifier
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(Level, String)>>,
}

impl RecordingNotifier {
    pub fn count(&self, level: Level) -> usize {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn info(&self, message: &str) {
        self.messages.lock().unwrap().push((Level::Info, message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.messages.lock().unwrap().push((Level::Warn, message.to_string()));
    }

    fn error(&self, message: &str) {
        self.messages.lock().unwrap().push((Level::Error, message.to_string()));
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Records every marker asset and rejects the ones listed as broken.
#[derive(Default)]
pub struct RecordingRenderer {
    broken: Vec<String>,
    shown: Mutex<Vec<String>>,
}

impl RecordingRenderer {
    pub fn with_broken(assets: &[&str]) -> Self {
        Self {
            broken: assets.iter().map(|a| a.to_string()).collect(),
            shown: Mutex::default(),
        }
    }

    pub fn shown(&self) -> Vec<String> {
        self.shown.lock().unwrap().clone()
    }
}

#[async_trait]
impl EffectsRenderer for RecordingRenderer {
    async fn show_marker(&self, _anchor: Point, marker: &MarkerSpec) -> Result<(), RenderError> {
        self.shown.lock().unwrap().push(marker.asset.clone());
        if self.broken.contains(&marker.asset) {
            return Err(RenderError::new(&marker.asset, "missing texture"));
        }
        Ok(())
    }
}

// ============================================================================
// Battlefield
// ============================================================================

/// One row of 100px tokens plus two hidden-ish enemies on the second row.
///
/// ```text
///  x:   0      100    200    300
///  y0:  hero   ally   gob    orc
///  y100              ghost  sneak
/// ```
pub fn tokens() -> Vec<Candidate> {
    let at = |id: &str, actor: &str, x: f64, y: f64, faction| {
        Candidate::new(id, actor, Point::new(x, y), Size::square(100.0), faction)
    };
    vec![
        at("t-hero", "a-hero", 0.0, 0.0, Faction::PlayerCharacter),
        at("t-ally", "a-ally", 100.0, 0.0, Faction::Ally),
        at("t-gob", "a-gob", 200.0, 0.0, Faction::Enemy),
        at("t-orc", "a-orc", 300.0, 0.0, Faction::Troop),
        at("t-ghost", "a-ghost", 200.0, 100.0, Faction::Enemy).with_hidden(true),
        at("t-sneak", "a-sneak", 300.0, 100.0, Faction::Enemy).with_stealth(true),
    ]
}

pub fn items() -> Vec<ItemRecord> {
    vec![
        ItemRecord::new("i-single", "Strike", ItemKind::Effect),
        ItemRecord::new("i-n", "Multi Shot", ItemKind::Effect).with_level(LevelValue::raw(2.0)),
        ItemRecord::new("i-area", "Blast", ItemKind::Spell).with_attack_roll("melee"),
        ItemRecord::new("i-scene", "Storm|ストーム", ItemKind::Effect),
        ItemRecord::new("e-fire", "Fireball", ItemKind::Effect).with_level(LevelValue::raw(3.0)),
        ItemRecord::new("i-combo", "Inferno", ItemKind::Combo).with_effects(["e-fire", "-"]),
    ]
}

pub fn hero() -> ActorRecord {
    ActorRecord::new("a-hero", "Hero", Faction::PlayerCharacter)
        .with_items(["i-single", "i-n", "i-area", "i-scene", "e-fire", "i-combo"])
}

pub fn actors(hero: ActorRecord) -> Vec<ActorRecord> {
    vec![
        hero,
        ActorRecord::new("a-ally", "Ally", Faction::Ally),
        ActorRecord::new("a-gob", "Goblin", Faction::Enemy),
        ActorRecord::new("a-orc", "Orc", Faction::Troop),
        ActorRecord::new("a-nobody", "Offscreen", Faction::Enemy),
    ]
}

pub fn berserk_hero() -> ActorRecord {
    hero().with_berserk(BerserkState::new(BerserkState::DESTRUCTION))
}

pub struct Harness {
    pub scene: Arc<MemoryScene>,
    pub picker: Arc<ScriptedPicker>,
    pub notifier: Arc<RecordingNotifier>,
    pub renderer: Arc<RecordingRenderer>,
    pub assistant: TargetingAssistant,
}

pub struct HarnessBuilder {
    scene: MemoryScene,
    picker: ScriptedPicker,
    renderer: RecordingRenderer,
    hero: ActorRecord,
    settings: AssistSettings,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self {
            scene: MemoryScene::new(SquareGrid::new(100.0), tokens())
                .with_combat(true)
                .with_controlled(vec![TokenId::new("t-hero")]),
            picker: ScriptedPicker::default(),
            renderer: RecordingRenderer::default(),
            hero: hero(),
            settings: AssistSettings::default().immediate(),
        }
    }

    pub fn scene(mut self, f: impl FnOnce(MemoryScene) -> MemoryScene) -> Self {
        self.scene = f(self.scene);
        self
    }

    pub fn picks(mut self, points: impl IntoIterator<Item = Option<(f64, f64)>>) -> Self {
        self.picker = ScriptedPicker::new(points);
        self
    }

    pub fn picker(mut self, picker: ScriptedPicker) -> Self {
        self.picker = picker;
        self
    }

    pub fn renderer(mut self, renderer: RecordingRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn hero(mut self, hero: ActorRecord) -> Self {
        self.hero = hero;
        self
    }

    pub fn settings(mut self, settings: AssistSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> Harness {
        let scene = Arc::new(self.scene);
        let picker = Arc::new(self.picker);
        let notifier = Arc::new(RecordingNotifier::default());
        let renderer = Arc::new(self.renderer);
        let assistant = TargetingAssistant::builder()
            .scene(scene.clone())
            .catalog(Arc::new(MemoryCatalog::new(actors(self.hero), items())))
            .picker(picker.clone())
            .renderer(renderer.clone())
            .notifier(notifier.clone())
            .highlights(Arc::new(StaticRangeHighlights::new(vec![
                HighlightEntry::for_actor("a-hero", 2),
            ])))
            .settings(self.settings)
            .build()
            .unwrap();
        Harness {
            scene,
            picker,
            notifier,
            renderer,
            assistant,
        }
    }
}

pub fn ids(tokens: &[&str]) -> Vec<TokenId> {
    tokens.iter().map(|t| TokenId::new(*t)).collect()
}
