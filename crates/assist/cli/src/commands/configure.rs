//! Save the targeting config of one item.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use assist_core::{ActorId, TargetType, TargetingForm};
use assist_runtime::ItemId;

use super::{Session, load_fixture, parse_target_type};

/// Configure how an item picks its targets
#[derive(Parser, Debug)]
pub struct Configure {
    /// Scene fixture (JSON) holding the item and its owner
    #[arg(long)]
    pub scene: PathBuf,

    /// Item id
    pub item: String,

    /// Target type: -, Single, N, Area, Area(Enemies), Area(Allies),
    /// Scene, Scene(Enemies), Scene(Allies)
    #[arg(long = "type", value_parser = parse_target_type)]
    pub target_type: TargetType,

    /// N expression, e.g. `3`, `[level]+1`, `[Fireball]*2` (N only)
    #[arg(long = "n")]
    pub n_expression: Option<String>,

    /// Allow stealthed tokens to be targeted
    #[arg(long)]
    pub ignore_stealth: bool,

    /// Leave the acting actor's own tokens out (Area, Area(Allies), Scene*)
    #[arg(long)]
    pub exclude_self: bool,

    /// Actor whose sheet resolves N references (default: the item's owner)
    #[arg(long)]
    pub actor: Option<String>,
}

impl Configure {
    pub fn execute(self, session: &Session) -> Result<()> {
        let fixture = load_fixture(&self.scene)?;
        let (assistant, _) = session.assistant(&fixture, &[])?;

        if self.n_expression.is_some() && self.target_type != TargetType::N {
            tracing::warn!("--n is ignored for {} targeting", self.target_type);
        }

        let form = TargetingForm {
            target_type: self.target_type,
            n_expression: self.n_expression,
            ignore_stealth: self.ignore_stealth,
            exclude_self: self.exclude_self,
        };
        let actor = self.actor.map(ActorId::new);
        let config = assistant.configure(&ItemId::new(&self.item), form, actor.as_ref())?;

        println!("{}", serde_json::to_string_pretty(&config)?);
        Ok(())
    }
}
