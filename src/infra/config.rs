use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use env_helpers::get_env_default;
use url::Url;

use crate::adapters::api::DEFAULT_API_BASE;
use crate::application::formatters::Locale;
use crate::application::query_cache::QueryConfig;
use crate::infra::error::InfraError;

pub const DEFAULT_SESSION_FILE: &str = ".vetdesk/session.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backend base URL including the `/api/v1` path.
    pub api_base_url: Url,
    /// Where the persisted session keys live between runs.
    pub session_file: PathBuf,
    pub locale: Locale,
    pub query_retry: u32,
    pub query_stale_time: Duration,
    pub http_timeout: Duration,
    /// Structured JSON log output, in addition to the console.
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, InfraError> {
        Self::from_vars(|var, default| get_env_default(var, default.to_string()))
    }

    /// Build from a lookup returning the raw value of `var`, or `default` when unset.
    pub fn from_vars(lookup: impl Fn(&'static str, &str) -> String) -> Result<Self, InfraError> {
        let api_base_url = parse(&lookup, "API_BASE_URL", DEFAULT_API_BASE)?;
        let session_file = PathBuf::from(lookup("SESSION_FILE", DEFAULT_SESSION_FILE));
        let locale = parse(&lookup, "LOCALE", "pt-BR")?;
        let query_retry = parse(&lookup, "QUERY_RETRY", "3")?;
        let query_stale_secs: u64 = parse(&lookup, "QUERY_STALE_SECS", "60")?;
        let http_timeout_secs: u64 = parse(&lookup, "HTTP_TIMEOUT_SECS", "30")?;
        let log_file = Some(lookup("LOG_FILE", ""))
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        if http_timeout_secs == 0 {
            return Err(InfraError::ConfigInvalid {
                var: "HTTP_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            api_base_url,
            session_file,
            locale,
            query_retry,
            query_stale_time: Duration::from_secs(query_stale_secs),
            http_timeout: Duration::from_secs(http_timeout_secs),
            log_file,
        })
    }

    pub fn query_config(&self) -> QueryConfig {
        QueryConfig {
            retry: self.query_retry,
            stale_time: self.query_stale_time,
            ..QueryConfig::default()
        }
    }
}

fn parse<T>(
    lookup: &impl Fn(&'static str, &str) -> String,
    var: &'static str,
    default: &str,
) -> Result<T, InfraError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(var, default);
    raw.trim().parse().map_err(|e: T::Err| InfraError::ConfigInvalid {
        var,
        reason: e.to_string(),
    })
}
