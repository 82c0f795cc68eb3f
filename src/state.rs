use crate::{
    config::RuntimeConfiguration,
    error::RollbookResult,
    storage::{SqliteStore, StudentStore},
};
use std::sync::Arc;

/// Shared application state, passed to every handler via axum's `State`
/// extractor rather than through any ambient global.
#[derive(Clone)]
pub struct RollbookState {
    store: Arc<dyn StudentStore>,
    config: RuntimeConfiguration,
}

impl RollbookState {
    pub async fn new(config: RuntimeConfiguration) -> RollbookResult<Self> {
        let store = SqliteStore::connect(config.storage_path()).await?;
        Ok(Self::with_store(Arc::new(store), config))
    }

    /// Builds state around an arbitrary store implementation.
    pub fn with_store(store: Arc<dyn StudentStore>, config: RuntimeConfiguration) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &dyn StudentStore {
        self.store.as_ref()
    }

    pub fn config(&self) -> &RuntimeConfiguration {
        &self.config
    }
}
