//! Deterministic targeting kernel shared by the runtime and offline tools.
//!
//! `assist-core` owns the two pieces of real logic behind the targeting
//! assistant: the N-value expression resolver ([`expr`]) and the spatial
//! target selector ([`select`]). Everything here is pure: callers hand in
//! candidates, geometry and context, and get back a target set or a typed
//! failure. Host integration (pickers, canvases, persistence) lives in
//! `assist-runtime`.
pub mod candidate;
pub mod config;
pub mod error;
pub mod expr;
pub mod faction;
pub mod geometry;
pub mod item;
pub mod select;

pub use candidate::{ActorId, Candidate, TokenId};
pub use config::{ConfigError, TargetType, TargetingConfig, TargetingForm};
pub use error::{AssistError, ErrorSeverity};
pub use expr::{NValue, ResolveError, resolve};
pub use faction::{BerserkState, Faction, FactionScope, Side};
pub use geometry::{GridCell, GridGeometry, Point, Rect, Size, SquareGrid};
pub use item::{Constituent, ItemKind, LevelValue, ResolutionContext};
pub use select::{
    Footprint, HighlightedRegion, NTargetProgress, SelectError, SelectionRequest, select,
};
