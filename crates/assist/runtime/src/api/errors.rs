//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the host collaborators, the config store, and the
//! core kernel so callers can bubble them up with consistent context.
use thiserror::Error;

use assist_core::{ActorId, AssistError, ConfigError, ErrorSeverity, ResolveError, SelectError};

use crate::records::ItemId;
use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("targeting is only available during combat")]
    CombatRequired,

    #[error("canvas did not become ready after {attempts} attempts")]
    SurfaceNotReady { attempts: u32 },

    #[error("no token is controlled")]
    NoControlledToken,

    #[error("actor {0} has no token on the canvas")]
    ActorHasNoToken(ActorId),

    #[error("actor {0} not found")]
    ActorNotFound(ActorId),

    #[error("item {0} not found")]
    ItemNotFound(ItemId),

    #[error("no range highlight is available for the source token")]
    NoRangeHighlight,

    #[error("invalid N value")]
    InvalidNValue(#[source] ResolveError),

    #[error("stored targeting config is unusable")]
    InvalidConfig(#[source] ConfigError),

    #[error("item {0} has no targeting config")]
    NotConfigured(ItemId),

    #[error("crosshair picker failed")]
    Picker(#[source] PickerError),

    #[error("effects renderer failed")]
    Renderer(#[source] RenderError),

    #[error("target selection failed")]
    Selection(#[source] SelectError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("assistant requires a {0} before building")]
    MissingCollaborator(&'static str),
}

impl From<ConfigError> for RuntimeError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidNValue(inner) => Self::InvalidNValue(inner),
            other => Self::InvalidConfig(other),
        }
    }
}

impl From<SelectError> for RuntimeError {
    fn from(err: SelectError) -> Self {
        match err {
            SelectError::NoHighlightedRegion => Self::NoRangeHighlight,
            other => Self::Selection(other),
        }
    }
}

impl AssistError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CombatRequired
            | Self::NoControlledToken
            | Self::ActorHasNoToken(_)
            | Self::NoRangeHighlight
            | Self::NotConfigured(_) => ErrorSeverity::Recoverable,
            Self::InvalidNValue(_) => ErrorSeverity::Validation,
            Self::SurfaceNotReady { .. }
            | Self::ActorNotFound(_)
            | Self::ItemNotFound(_)
            | Self::InvalidConfig(_)
            | Self::Picker(_)
            | Self::Renderer(_)
            | Self::Selection(_)
            | Self::Store(_)
            | Self::MissingCollaborator(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CombatRequired => "RUNTIME_COMBAT_REQUIRED",
            Self::SurfaceNotReady { .. } => "RUNTIME_SURFACE_NOT_READY",
            Self::NoControlledToken => "RUNTIME_NO_CONTROLLED_TOKEN",
            Self::ActorHasNoToken(_) => "RUNTIME_ACTOR_HAS_NO_TOKEN",
            Self::ActorNotFound(_) => "RUNTIME_ACTOR_NOT_FOUND",
            Self::ItemNotFound(_) => "RUNTIME_ITEM_NOT_FOUND",
            Self::NoRangeHighlight => "RUNTIME_NO_RANGE_HIGHLIGHT",
            Self::InvalidNValue(_) => "RUNTIME_INVALID_N_VALUE",
            Self::InvalidConfig(_) => "RUNTIME_INVALID_CONFIG",
            Self::NotConfigured(_) => "RUNTIME_NOT_CONFIGURED",
            Self::Picker(_) => "RUNTIME_PICKER",
            Self::Renderer(_) => "RUNTIME_RENDERER",
            Self::Selection(_) => "RUNTIME_SELECTION",
            Self::Store(_) => "RUNTIME_STORE",
            Self::MissingCollaborator(_) => "RUNTIME_MISSING_COLLABORATOR",
        }
    }
}

/// Failure reported by a [`CrosshairPicker`](super::CrosshairPicker).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct PickerError {
    pub message: String,
}

impl PickerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure reported by an [`EffectsRenderer`](super::EffectsRenderer).
#[derive(Debug, Error)]
#[error("cannot render marker {asset}: {message}")]
pub struct RenderError {
    pub asset: String,
    pub message: String,
}

impl RenderError {
    pub fn new(asset: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_count_is_lifted_out_of_config_error() {
        let err = RuntimeError::from(ConfigError::InvalidNValue(ResolveError::Empty));
        assert!(matches!(err, RuntimeError::InvalidNValue(ResolveError::Empty)));
        assert_eq!(err.severity(), ErrorSeverity::Validation);

        let err = RuntimeError::from(ConfigError::MissingCount);
        assert!(matches!(err, RuntimeError::InvalidConfig(_)));
    }

    #[test]
    fn user_aborts_are_recoverable() {
        assert!(RuntimeError::CombatRequired.severity().is_recoverable());
        assert!(RuntimeError::NoRangeHighlight.severity().is_recoverable());
        assert!(!RuntimeError::SurfaceNotReady { attempts: 50 }.severity().is_recoverable());
    }
}
