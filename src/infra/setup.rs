use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::{api::ApiClient, cli::app_state::AppState, storage::FileStore},
    application::{
        ports::{KeyValueStore, SessionGateway},
        query_cache::QueryCache,
        use_cases::session::SessionStore,
    },
    infra::{config::AppConfig, error::InfraError, http_client::try_build_client},
};

/// Wire storage, HTTP client, API, session and cache from configuration.
/// The session is restored from disk before this returns.
pub fn init_app_state(config: AppConfig) -> Result<AppState, InfraError> {
    let storage: Arc<dyn KeyValueStore> =
        Arc::new(FileStore::open(&config.session_file).map_err(InfraError::Storage)?);

    let http = try_build_client(config.http_timeout).map_err(InfraError::HttpClient)?;
    let api = ApiClient::new(http, config.api_base_url.clone(), storage.clone());

    let gateway: Arc<dyn SessionGateway> = Arc::new(api.auth());
    let mut session = SessionStore::new(storage.clone(), gateway);
    let state = session.initialize();
    debug!(?state, file = %config.session_file.display(), "Session restored");

    let cache = QueryCache::new(config.query_config());

    Ok(AppState {
        locale: config.locale,
        config: Arc::new(config),
        storage,
        api,
        session,
        cache,
    })
}

/// Console logs on stderr, plus structured JSON lines in `log_file` when given.
///
/// `RUST_LOG` wins over the default filter; `verbose` raises the default to debug.
pub fn init_tracing(log_file: Option<&Path>, verbose: bool) -> Result<(), InfraError> {
    let default_filter = if verbose { "vetdesk=debug" } else { "vetdesk=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact();

    let json_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(InfraError::LogFile)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(InfraError::LogFile)?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(Arc::new(file))
                    .with_current_span(true)
                    .with_span_list(true),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .map_err(InfraError::Tracing)
}
