//! Shared server state

use std::sync::Arc;

use shelf_registry::RegistryClient;
use shelf_store::CatalogStore;

/// State shared across all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CatalogStore>,
    pub registry: RegistryClient,
}

impl AppState {
    pub fn new(store: Arc<CatalogStore>, registry: RegistryClient) -> Self {
        Self { store, registry }
    }
}
