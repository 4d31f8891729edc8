use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::error::CoreResult;
use crate::storage::Store;

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<Map<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(values: Map<String, Value>) -> Self {
        Self {
            values: RwLock::new(values),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, keys: &[&str]) -> CoreResult<Map<String, Value>> {
        let values = self.values.read();
        Ok(keys
            .iter()
            .filter_map(|key| values.get(*key).map(|value| (key.to_string(), value.clone())))
            .collect())
    }

    async fn set(&self, values: Map<String, Value>) -> CoreResult<()> {
        self.values.write().extend(values);
        Ok(())
    }
}
