//! In-memory ConfigStore implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use assist_core::TargetingConfig;

use super::{ConfigStore, Result, StoreError};
use crate::records::ItemId;

#[derive(Default)]
pub struct InMemoryConfigStore {
    configs: RwLock<HashMap<ItemId, TargetingConfig>>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn save(&self, item: &ItemId, config: &TargetingConfig) -> Result<()> {
        let mut configs = self
            .configs
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        configs.insert(item.clone(), config.clone());
        Ok(())
    }

    fn load(&self, item: &ItemId) -> Result<Option<TargetingConfig>> {
        let configs = self
            .configs
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(configs.get(item).cloned())
    }

    fn delete(&self, item: &ItemId) -> Result<()> {
        let mut configs = self
            .configs
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        configs.remove(item);
        Ok(())
    }

    fn list(&self) -> Result<Vec<ItemId>> {
        let configs = self
            .configs
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        let mut ids: Vec<ItemId> = configs.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assist_core::TargetType;

    fn config(target_type: TargetType) -> TargetingConfig {
        TargetingConfig {
            target_type,
            ..TargetingConfig::default()
        }
    }

    #[test]
    fn last_write_wins() {
        let store = InMemoryConfigStore::new();
        let item = ItemId::new("i1");
        store.save(&item, &config(TargetType::Single)).unwrap();
        store.save(&item, &config(TargetType::Area)).unwrap();

        assert_eq!(store.load(&item).unwrap().unwrap().target_type, TargetType::Area);
        assert_eq!(store.list().unwrap(), vec![item.clone()]);

        store.delete(&item).unwrap();
        assert!(store.load(&item).unwrap().is_none());
    }
}
