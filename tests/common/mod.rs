//! Shared fixtures for the HTTP-level tests: a mock backend and login payloads.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{Value, json};
use url::Url;
use vetdesk::adapters::api::ApiClient;
use vetdesk::application::ports::KeyValueStore;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub const ACCESS_TOKEN: &str = "acc-token-abc";
pub const REFRESH_TOKEN: &str = "ref-token-xyz";

pub struct MockBackend {
    pub server: MockServer,
}

impl MockBackend {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL the client is configured with, mirroring the production `/api/v1` prefix.
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("{}/api/v1", self.server.uri())).unwrap()
    }

    pub fn client(&self, storage: Arc<dyn KeyValueStore>) -> ApiClient {
        ApiClient::new(reqwest::Client::new(), self.base_url(), storage)
    }

    pub async fn mock_login_success(&self, body: Value) {
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": body })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_logout(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/logout"))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(&self.server)
            .await;
    }
}

pub fn user_json(role: &str) -> Value {
    json!({
        "id": "user-7",
        "firstName": "Helena",
        "lastName": "Ribeiro",
        "email": "helena@campoverde.vet",
        "role": role,
        "permissions": { "financial": true }
    })
}

pub fn account_json(status: &str) -> Value {
    json!({
        "id": "acct-3",
        "name": "Campo Verde",
        "plan": "professional",
        "subscriptionStatus": status,
        "trialEndsAt": null
    })
}

pub fn login_body(role: &str, status: &str) -> Value {
    json!({
        "user": user_json(role),
        "account": account_json(status),
        "tokens": { "accessToken": ACCESS_TOKEN, "refreshToken": REFRESH_TOKEN }
    })
}
