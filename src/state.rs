//! Shared application state for all routes.

use crate::config::Catalog;
use crate::store::{MemoryStore, RecordStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, catalog: Arc<Catalog>) -> Self {
        AppState { store, catalog }
    }

    /// Fresh, empty in-memory store for `catalog`.
    pub fn in_memory(catalog: Catalog) -> Self {
        let store = MemoryStore::new(&catalog);
        AppState {
            store: Arc::new(store),
            catalog: Arc::new(catalog),
        }
    }
}
