//! Inspect saved targeting configs.

use anyhow::Result;
use clap::Parser;

use assist_runtime::{ConfigStore, ItemId};

use super::Session;

/// Show saved targeting configs
#[derive(Parser, Debug)]
pub struct Show {
    /// Item id; lists every configured item when omitted
    pub item: Option<String>,

    /// Delete the item's config instead of printing it
    #[arg(long, requires = "item")]
    pub delete: bool,
}

impl Show {
    pub fn execute(self, session: &Session) -> Result<()> {
        let store = session.store.as_ref();

        let Some(item) = self.item.map(ItemId::new) else {
            let ids = store.list()?;
            if ids.is_empty() {
                println!("no targeting configs in {}", store.base_dir().display());
            }
            for id in ids {
                match store.load(&id)? {
                    Some(config) => println!("{id}\t{}", config.target_type),
                    None => println!("{id}\t?"),
                }
            }
            return Ok(());
        };

        if self.delete {
            store.delete(&item)?;
            println!("deleted {item}");
            return Ok(());
        }

        match store.load(&item)? {
            Some(config) => println!("{}", serde_json::to_string_pretty(&config)?),
            None => anyhow::bail!("item {item} has no targeting config"),
        }
        Ok(())
    }
}
