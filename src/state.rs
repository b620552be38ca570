use std::sync::Arc;

use crate::config::Config;
use crate::store::SharedDocumentStore;

/// Shared handles every handler receives
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SharedDocumentStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = SharedDocumentStore::new(config.initial_body.clone(), config.lease_ttl());
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}
