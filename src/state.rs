use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::Config;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub api: ApiClient,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config, api: ApiClient, sessions: SessionStore) -> Self {
        Self {
            config: Arc::new(config),
            api,
            sessions,
        }
    }
}
