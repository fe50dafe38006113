use thiserror::Error;

/// Errors that can occur while the terminal front end starts up.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("Configuration error: {var} is invalid ({reason})")]
    ConfigInvalid { var: &'static str, reason: String },

    #[error("Cannot open log file")]
    LogFile(#[source] std::io::Error),

    #[error("Tracing subscriber could not be installed")]
    Tracing(#[source] tracing_subscriber::util::TryInitError),

    #[error("HTTP client could not be built")]
    HttpClient(#[source] reqwest::Error),

    #[error("Session storage could not be opened")]
    Storage(#[source] crate::app_error::StorageError),
}
