//! Run an item's targeting against a scene fixture.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use assist_core::{ActorId, Point};
use assist_runtime::{ItemId, MemoryScene, Scene, SceneFixture, TargetingOutcome};

use super::{Session, load_fixture, parse_pick};

/// Run the saved targeting of an item
#[derive(Parser, Debug)]
pub struct Invoke {
    /// Scene fixture (JSON)
    #[arg(long)]
    pub scene: PathBuf,

    /// Item id
    pub item: String,

    /// Act as this actor (item-use mode); otherwise the first controlled
    /// token acts
    #[arg(long)]
    pub actor: Option<String>,

    /// Scripted pick as x,y; repeat for several. Without any, picks are read
    /// from stdin
    #[arg(long = "pick", value_parser = parse_pick)]
    pub picks: Vec<Point>,

    /// Write resulting targets and control back into the fixture
    #[arg(long)]
    pub write_back: bool,
}

impl Invoke {
    pub async fn execute(self, session: &Session) -> Result<()> {
        let mut fixture = load_fixture(&self.scene)?;
        let (assistant, scene) = session.assistant(&fixture, &self.picks)?;

        let actor = self.actor.map(ActorId::new);
        let outcome = assistant
            .invoke(&ItemId::new(&self.item), actor.as_ref())
            .await?;

        print_outcome(&outcome);
        if self.write_back {
            write_back(&mut fixture, &scene, &self.scene)?;
        }
        Ok(())
    }
}

/// React to an item used from a chat card
#[derive(Parser, Debug)]
pub struct UseItem {
    /// Scene fixture (JSON)
    #[arg(long)]
    pub scene: PathBuf,

    /// Actor that used the item
    pub actor: String,

    /// Item name as shown on the card, e.g. "[Major] Fireball"
    pub name: String,

    /// Scripted pick as x,y; repeat for several
    #[arg(long = "pick", value_parser = parse_pick)]
    pub picks: Vec<Point>,

    /// Write resulting targets and control back into the fixture
    #[arg(long)]
    pub write_back: bool,
}

impl UseItem {
    pub async fn execute(self, session: &Session) -> Result<()> {
        let mut fixture = load_fixture(&self.scene)?;
        let (assistant, scene) = session.assistant(&fixture, &self.picks)?;

        match assistant
            .on_item_used(&ActorId::new(&self.actor), &self.name)
            .await?
        {
            Some(outcome) => print_outcome(&outcome),
            None => println!("no targeting configured for {:?}", self.name),
        }

        if self.write_back {
            write_back(&mut fixture, &scene, &self.scene)?;
        }
        Ok(())
    }
}

fn print_outcome(outcome: &TargetingOutcome) {
    let targets: Vec<&str> = outcome.targeted.iter().map(|t| t.as_str()).collect();
    println!("type:    {}", outcome.target_type);
    println!("status:  {:?}", outcome.status);
    println!("targets: {}", targets.join(", "));
}

fn write_back(fixture: &mut SceneFixture, scene: &MemoryScene, path: &PathBuf) -> Result<()> {
    fixture.targets = scene.targets();
    fixture.controlled = scene.controlled();

    let json = serde_json::to_string_pretty(fixture)?;
    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, json)
        .with_context(|| format!("Failed to write {}", temp_path.display()))?;
    std::fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    tracing::info!("Updated scene fixture: {}", path.display());
    Ok(())
}
