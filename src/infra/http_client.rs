//! HTTP client factory with consistent timeout configuration.
//!
//! The API client must be built through `try_build_client()` rather than
//! constructing `reqwest::Client` directly.

use std::time::Duration;

use reqwest::Client;

/// Default connect timeout (TCP handshake + TLS).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default request timeout (total request/response time).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build an HTTP client with the default connect timeout and the given request timeout.
pub fn try_build_client(request_timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(request_timeout))
        .timeout(request_timeout)
        .user_agent(concat!("vetdesk/", env!("CARGO_PKG_VERSION")))
        .build()
}
