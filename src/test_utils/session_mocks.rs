//! In-memory implementation of the session gateway port.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::adapters::storage::MemoryStore;
use crate::app_error::{ApiError, ApiResult};
use crate::application::ports::SessionGateway;
use crate::domain::entities::LoginResponse;

/// Gateway that answers login with a canned body (or a 401) and can be told
/// to fail sign-out.
#[derive(Default)]
pub struct InMemorySessionGateway {
    login_body: Option<Value>,
    logout_fails: AtomicBool,
    pub login_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    observed_store: Option<Arc<MemoryStore>>,
    /// Keys present in the observed store at the moment each login call arrived.
    pub keys_at_login: Mutex<Vec<Vec<String>>>,
}

impl InMemorySessionGateway {
    pub fn succeeding(login_body: Value) -> Self {
        Self {
            login_body: Some(login_body),
            ..Default::default()
        }
    }

    pub fn rejecting() -> Self {
        Self::default()
    }

    pub fn with_failing_logout(self) -> Self {
        self.logout_fails.store(true, Ordering::SeqCst);
        self
    }

    pub fn observing(mut self, store: Arc<MemoryStore>) -> Self {
        self.observed_store = Some(store);
        self
    }
}

#[async_trait]
impl SessionGateway for InMemorySessionGateway {
    async fn login(&self, _email: &str, _password: &str) -> ApiResult<LoginResponse> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(store) = &self.observed_store {
            self.keys_at_login.lock().unwrap().push(store.keys());
        }

        match &self.login_body {
            Some(body) => serde_json::from_value(body.clone())
                .map_err(|e| ApiError::Decode(e.to_string())),
            None => Err(ApiError::from_response_body(
                401,
                br#"{"message":"Invalid email or password"}"#,
            )),
        }
    }

    async fn logout(&self) -> ApiResult<()> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        if self.logout_fails.load(Ordering::SeqCst) {
            return Err(ApiError::from_response_body(503, b""));
        }
        Ok(())
    }
}
