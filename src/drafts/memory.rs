use async_trait::async_trait;
use dashmap::DashMap;

use super::DraftStore;
use crate::error::DraftError;

/// Process-local draft store. Everything is lost on restart.
#[derive(Default)]
pub struct InMemoryDraftStore {
    values: DashMap<String, String>,
    lists: DashMap<String, Vec<String>>,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently holding a value or a list.
    pub fn len(&self) -> usize {
        self.values.len() + self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DraftStore for InMemoryDraftStore {
    async fn set(&self, key: &str, value: &str) -> Result<(), DraftError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, DraftError> {
        Ok(self.values.get(key).map(|v| v.value().clone()))
    }

    async fn delete(&self, key: &str) -> Result<(), DraftError> {
        self.values.remove(key);
        self.lists.remove(key);
        Ok(())
    }

    async fn append(&self, key: &str, value: &str) -> Result<(), DraftError> {
        self.lists
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
        Ok(())
    }

    async fn read_list(&self, key: &str) -> Result<Vec<String>, DraftError> {
        Ok(self.lists.get(key).map(|l| l.value().clone()).unwrap_or_default())
    }
}
