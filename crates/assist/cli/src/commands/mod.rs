//! Subcommands and the session they share.
mod configure;
mod invoke;
mod show;

pub use configure::Configure;
pub use invoke::{Invoke, UseItem};
pub use show::Show;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use assist_core::{Point, TargetType};
use assist_runtime::{
    AssistSettings, CrosshairPicker, FileConfigStore, MemoryScene, SceneFixture,
    TargetingAssistant,
};

use crate::console::{self, ConsoleNotifier, ConsoleRenderer, ScriptPicker, StdinPicker};

/// Settings and the config store every command works against.
pub struct Session {
    pub settings: AssistSettings,
    pub store: Arc<FileConfigStore>,
}

impl Session {
    pub fn open(data_dir: &Path) -> Result<Self> {
        let store = FileConfigStore::new(data_dir)
            .with_context(|| format!("Failed to open config store: {}", data_dir.display()))?;
        tracing::debug!("Config store: {}", data_dir.display());
        Ok(Self {
            settings: AssistSettings::from_env(),
            store: Arc::new(store),
        })
    }

    /// Wires an assistant over `fixture`; the scene is returned for inspection.
    pub fn assistant(
        &self,
        fixture: &SceneFixture,
        picks: &[Point],
    ) -> Result<(TargetingAssistant, Arc<MemoryScene>)> {
        let scene = Arc::new(fixture.scene());
        let picker: Arc<dyn CrosshairPicker> = if picks.is_empty() {
            Arc::new(StdinPicker::new())
        } else {
            Arc::new(ScriptPicker::new(picks.iter().copied()))
        };

        let assistant = TargetingAssistant::builder()
            .scene(scene.clone())
            .catalog(Arc::new(fixture.catalog()))
            .highlights(Arc::new(fixture.highlights()))
            .store(self.store.clone())
            .picker(picker)
            .renderer(Arc::new(ConsoleRenderer))
            .notifier(Arc::new(ConsoleNotifier))
            .settings(self.settings.clone())
            .build()?;
        Ok((assistant, scene))
    }
}

pub fn load_fixture(path: &PathBuf) -> Result<SceneFixture> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scene fixture: {}", path.display()))?;
    let fixture = SceneFixture::from_json(&json)
        .with_context(|| format!("Invalid scene fixture: {}", path.display()))?;
    tracing::info!(
        "Loaded scene {} with {} tokens, {} items",
        path.display(),
        fixture.tokens.len(),
        fixture.items.len()
    );
    Ok(fixture)
}

pub(crate) fn parse_target_type(value: &str) -> Result<TargetType, String> {
    value.parse().map_err(|_| {
        format!(
            "unknown target type {value:?}; expected one of -, Single, N, Area, Area(Enemies), \
             Area(Allies), Scene, Scene(Enemies), Scene(Allies)"
        )
    })
}

pub(crate) fn parse_pick(value: &str) -> Result<Point, String> {
    console::parse_point(value).ok_or_else(|| format!("expected x,y but got {value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use assist_core::{TargetingForm, TokenId};
    use assist_runtime::{ConfigStore, ItemId, OutcomeStatus, Scene};

    fn demo_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../../demos/skirmish.json")
    }

    fn session(dir: &Path) -> Session {
        let store = FileConfigStore::new(dir).unwrap();
        Session {
            settings: AssistSettings::default().immediate(),
            store: Arc::new(store),
        }
    }

    #[test]
    fn demo_fixture_loads() {
        let fixture = load_fixture(&demo_path()).unwrap();
        assert_eq!(fixture.tokens.len(), 5);
        assert_eq!(fixture.controlled, vec![TokenId::new("t-kaito")]);
    }

    #[test]
    fn missing_fixture_is_reported() {
        let err = load_fixture(&PathBuf::from("/nonexistent/scene.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read scene fixture"));
    }

    #[test]
    fn target_types_parse_by_label() {
        assert_eq!(parse_target_type("Area(Enemies)"), Ok(TargetType::AreaEnemies));
        assert_eq!(parse_target_type("-"), Ok(TargetType::None));
        assert!(parse_target_type("Everyone").is_err());
        assert!(parse_pick("10;20").is_err());
    }

    #[tokio::test]
    async fn scripted_single_pick_targets_the_token_under_the_anchor() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(dir.path());
        let fixture = load_fixture(&demo_path()).unwrap();

        let (assistant, _) = session.assistant(&fixture, &[]).unwrap();
        let form = TargetingForm {
            target_type: TargetType::Single,
            ..TargetingForm::default()
        };
        assistant
            .configure(&ItemId::new("i-blade"), form, None)
            .unwrap();
        assert!(session.store.load(&ItemId::new("i-blade")).unwrap().is_some());

        let (assistant, scene) = session
            .assistant(&fixture, &[Point::new(250.0, 150.0)])
            .unwrap();
        let outcome = assistant
            .invoke(&ItemId::new("i-blade"), None)
            .await
            .unwrap();

        assert_eq!(outcome.status, OutcomeStatus::Completed);
        assert_eq!(outcome.targeted, vec![TokenId::new("t-hound")]);
        assert_eq!(scene.targets(), vec![TokenId::new("t-hound")]);
    }
}
