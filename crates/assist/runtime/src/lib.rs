//! Runtime orchestration for the targeting assistant.
//!
//! This crate drives the pure `assist-core` kernel against a live host:
//! it resolves the acting token, waits for the canvas, runs crosshair picks
//! with retries and cancellation, and commits the resulting target set.
//! Every host capability is an injected trait object so the same flows run
//! against a real virtual tabletop, the CLI fixture scene, or test doubles.
//!
//! Modules are organized by responsibility:
//! - [`api`] declares the collaborator traits and the runtime error type
//! - [`assistant`] hosts [`TargetingAssistant`] and its builder
//! - [`store`] persists per-item [`TargetingConfig`](assist_core::TargetingConfig)s
//! - [`highlight`] and [`fixture`] provide in-memory collaborators reused by
//!   the CLI and by tests
pub mod api;
pub mod assistant;
pub mod fixture;
pub mod highlight;
pub mod records;
pub mod settings;
pub mod store;

pub use api::{
    Catalog, CrosshairPicker, CrosshairPrompt, DEFAULT_MARKER_ASSET, EffectsRenderer, MarkerSpec,
    NoopRenderer, Notifier, PickerError, RangeHighlights, RenderError, Result, RuntimeError, Scene,
    TracingNotifier,
};
pub use assistant::{OutcomeStatus, TargetingAssistant, TargetingAssistantBuilder, TargetingOutcome};
pub use fixture::{MemoryCatalog, MemoryScene, SceneFixture};
pub use highlight::{HighlightEntry, MAX_HIGHLIGHT_RANGE, StaticRangeHighlights};
pub use records::{ActorConditions, ActorRecord, ItemId, ItemRecord};
pub use settings::AssistSettings;
pub use store::{ConfigStore, FileConfigStore, InMemoryConfigStore, StoreError};
