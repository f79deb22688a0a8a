// uiconf-widgets/src/pivot_grid/state.rs
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use uiconf_core::OperationError;

/// Where `stateStoring` keeps the grid layout
#[async_trait(?Send)]
pub trait StateStore {
    async fn load(&self, key: &str) -> Result<Option<Value>, OperationError>;

    async fn save(&mut self, key: &str, state: &Value) -> Result<(), OperationError>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStateStore {
    entries: HashMap<String, Value>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }
}

#[async_trait(?Send)]
impl StateStore for InMemoryStateStore {
    async fn load(&self, key: &str) -> Result<Option<Value>, OperationError> {
        Ok(self.entries.get(key).cloned())
    }

    async fn save(&mut self, key: &str, state: &Value) -> Result<(), OperationError> {
        self.entries.insert(key.to_string(), state.clone());
        Ok(())
    }
}
