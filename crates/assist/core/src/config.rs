//! Per-item targeting configuration.
//!
//! A [`TargetingConfig`] is produced from a confirmed [`TargetingForm`] and
//! persisted per item. The record shape matches what the host stored
//! historically (`targetType`, `nValue`, `parsedNValue`, `ignoreStealth`,
//! `excludeSelf`), so existing saves keep loading.

use crate::error::{AssistError, ErrorSeverity};
use crate::expr::{self, NValue, ResolveError};
use crate::faction::FactionScope;
use crate::item::ResolutionContext;
use crate::select::Footprint;

// ============================================================================
// Target Type
// ============================================================================

/// How an item picks its targets.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetType {
    /// Targeting disabled for this item.
    #[default]
    #[strum(serialize = "-")]
    #[cfg_attr(feature = "serde", serde(rename = "-"))]
    None,

    /// One 1×1 pick; every matching token is targeted.
    Single,

    /// Repeated 1×1 picks until N tokens are targeted.
    N,

    /// One 3×3 pick.
    Area,

    #[strum(serialize = "Area(Enemies)")]
    #[cfg_attr(feature = "serde", serde(rename = "Area(Enemies)"))]
    AreaEnemies,

    #[strum(serialize = "Area(Allies)")]
    #[cfg_attr(feature = "serde", serde(rename = "Area(Allies)"))]
    AreaAllies,

    /// Every token inside the source's range highlight; no pick.
    Scene,

    #[strum(serialize = "Scene(Enemies)")]
    #[cfg_attr(feature = "serde", serde(rename = "Scene(Enemies)"))]
    SceneEnemies,

    #[strum(serialize = "Scene(Allies)")]
    #[cfg_attr(feature = "serde", serde(rename = "Scene(Allies)"))]
    SceneAllies,
}

impl TargetType {
    /// Pick footprint for anchored types; `None` for scene types and `None`.
    pub const fn footprint(self) -> Option<Footprint> {
        match self {
            Self::Single | Self::N => Some(Footprint::Single),
            Self::Area | Self::AreaEnemies | Self::AreaAllies => Some(Footprint::Area),
            Self::None | Self::Scene | Self::SceneEnemies | Self::SceneAllies => None,
        }
    }

    pub const fn faction_scope(self) -> FactionScope {
        match self {
            Self::AreaEnemies | Self::SceneEnemies => FactionScope::Enemies,
            Self::AreaAllies | Self::SceneAllies => FactionScope::Allies,
            _ => FactionScope::Any,
        }
    }

    pub const fn is_scene(self) -> bool {
        matches!(self, Self::Scene | Self::SceneEnemies | Self::SceneAllies)
    }

    pub const fn is_area(self) -> bool {
        matches!(self, Self::Area | Self::AreaEnemies | Self::AreaAllies)
    }

    /// Target types on which the "exclude self" option is offered.
    pub const fn supports_exclude_self(self) -> bool {
        matches!(
            self,
            Self::Area | Self::AreaAllies | Self::Scene | Self::SceneAllies
        )
    }
}

// ============================================================================
// Form & Config
// ============================================================================

/// Raw values confirmed by the user in the configuration dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TargetingForm {
    pub target_type: TargetType,
    pub n_expression: Option<String>,
    pub ignore_stealth: bool,
    pub exclude_self: bool,
}

/// Saved targeting configuration of one item.
///
/// Invariant: `resolved_n` is `Some` iff `target_type` is [`TargetType::N`]
/// and the expression resolved when the config was built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TargetingConfig {
    #[cfg_attr(feature = "serde", serde(default))]
    pub target_type: TargetType,
    #[cfg_attr(feature = "serde", serde(default, rename = "nValue"))]
    pub n_expression: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, rename = "parsedNValue"))]
    pub resolved_n: Option<NValue>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ignore_stealth: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub exclude_self: bool,
}

impl TargetingConfig {
    /// Builds a config from a confirmed form.
    ///
    /// For N targeting the expression is resolved against `ctx`; a failure
    /// rejects the whole form so a malformed count is never saved. The N
    /// expression is dropped for every other type, and `exclude_self` is
    /// cleared where the type does not offer it.
    pub fn build(form: TargetingForm, ctx: &ResolutionContext) -> Result<Self, ConfigError> {
        let (n_expression, resolved_n) = if form.target_type == TargetType::N {
            let expression = form.n_expression.unwrap_or_default();
            let resolved = expr::resolve(&expression, ctx)?;
            (Some(expression), Some(resolved))
        } else {
            (None, None)
        };

        Ok(Self {
            target_type: form.target_type,
            n_expression,
            resolved_n,
            ignore_stealth: form.ignore_stealth,
            exclude_self: form.exclude_self && form.target_type.supports_exclude_self(),
        })
    }

    /// Checks the N invariant on a record read back from storage.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (self.target_type, self.resolved_n) {
            (TargetType::N, None) => Err(ConfigError::MissingCount),
            (TargetType::N, Some(_)) | (_, None) => Ok(()),
            (other, Some(_)) => Err(ConfigError::UnexpectedCount(other)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.target_type != TargetType::None
    }

    /// Whether self-exclusion was requested and the type honours it.
    pub fn wants_exclude_self(&self) -> bool {
        self.exclude_self && self.target_type.supports_exclude_self()
    }
}

/// Why a form could not be turned into a config, or a stored one is unusable.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid N value: {0}")]
    InvalidNValue(#[from] ResolveError),

    #[error("N targeting has no resolved count")]
    MissingCount,

    #[error("{0} targeting must not carry a resolved count")]
    UnexpectedCount(TargetType),
}

impl AssistError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidNValue(_) => ErrorSeverity::Validation,
            Self::MissingCount | Self::UnexpectedCount(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidNValue(_) => "CONFIG_INVALID_N_VALUE",
            Self::MissingCount => "CONFIG_MISSING_COUNT",
            Self::UnexpectedCount(_) => "CONFIG_UNEXPECTED_COUNT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemKind, LevelValue};
    use strum::IntoEnumIterator;

    fn form(target_type: TargetType) -> TargetingForm {
        TargetingForm {
            target_type,
            ..TargetingForm::default()
        }
    }

    #[test]
    fn persisted_names_round_trip_through_strum() {
        for target_type in TargetType::iter() {
            let name = target_type.to_string();
            assert_eq!(name.parse::<TargetType>().unwrap(), target_type);
        }
        assert_eq!(TargetType::AreaEnemies.as_ref(), "Area(Enemies)");
        assert_eq!(TargetType::None.as_ref(), "-");
    }

    #[test]
    fn n_config_resolves_count_at_build_time() {
        let ctx = ResolutionContext::leveled(ItemKind::Effect, LevelValue::raw(2.0));
        let config = TargetingConfig::build(
            TargetingForm {
                n_expression: Some("[level]+1".into()),
                ..form(TargetType::N)
            },
            &ctx,
        )
        .unwrap();

        assert_eq!(config.resolved_n.map(NValue::get), Some(3));
        assert_eq!(config.n_expression.as_deref(), Some("[level]+1"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_count_rejects_the_form() {
        let ctx = ResolutionContext::new(ItemKind::Spell);
        let result = TargetingConfig::build(
            TargetingForm {
                n_expression: Some("[level]".into()),
                ..form(TargetType::N)
            },
            &ctx,
        );
        assert!(matches!(result, Err(ConfigError::InvalidNValue(_))));

        let missing = TargetingConfig::build(form(TargetType::N), &ctx);
        assert_eq!(missing, Err(ConfigError::InvalidNValue(ResolveError::Empty)));
    }

    #[test]
    fn non_n_types_drop_the_expression() {
        let ctx = ResolutionContext::new(ItemKind::Spell);
        let config = TargetingConfig::build(
            TargetingForm {
                n_expression: Some("3".into()),
                ..form(TargetType::Area)
            },
            &ctx,
        )
        .unwrap();
        assert_eq!(config.n_expression, None);
        assert_eq!(config.resolved_n, None);
    }

    #[test]
    fn exclude_self_is_cleared_where_unsupported() {
        let ctx = ResolutionContext::new(ItemKind::Spell);
        for target_type in TargetType::iter() {
            let config = TargetingConfig::build(
                TargetingForm {
                    exclude_self: true,
                    n_expression: Some("2".into()),
                    ..form(target_type)
                },
                &ctx,
            )
            .unwrap();
            assert_eq!(config.exclude_self, target_type.supports_exclude_self());
        }
    }

    #[test]
    fn validate_flags_broken_records() {
        let broken = TargetingConfig {
            target_type: TargetType::N,
            ..TargetingConfig::default()
        };
        assert_eq!(broken.validate(), Err(ConfigError::MissingCount));

        let stray = TargetingConfig {
            target_type: TargetType::Single,
            resolved_n: NValue::new(2),
            ..TargetingConfig::default()
        };
        assert_eq!(
            stray.validate(),
            Err(ConfigError::UnexpectedCount(TargetType::Single))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn record_uses_historical_field_names() {
        let json = r#"{
            "targetType": "Scene(Allies)",
            "nValue": null,
            "parsedNValue": null,
            "ignoreStealth": true,
            "excludeSelf": true
        }"#;
        let config: TargetingConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.target_type, TargetType::SceneAllies);
        assert!(config.ignore_stealth);
        assert!(config.wants_exclude_self());

        let n: TargetingConfig =
            serde_json::from_str(r#"{"targetType":"N","nValue":"3","parsedNValue":3}"#).unwrap();
        assert_eq!(n.resolved_n, NValue::new(3));
        assert!(serde_json::from_str::<TargetingConfig>(r#"{"parsedNValue":150}"#).is_err());
    }
}
