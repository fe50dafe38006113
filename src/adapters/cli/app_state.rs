use std::sync::Arc;

use crate::adapters::api::ApiClient;
use crate::application::formatters::Locale;
use crate::application::ports::KeyValueStore;
use crate::application::query_cache::QueryCache;
use crate::application::use_cases::session::SessionStore;
use crate::infra::config::AppConfig;

/// Everything a command needs, built once at startup.
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn KeyValueStore>,
    pub api: ApiClient,
    pub session: SessionStore,
    pub cache: QueryCache,
    pub locale: Locale,
}
