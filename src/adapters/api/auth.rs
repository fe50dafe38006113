use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Value, json};
use tracing::instrument;

use crate::app_error::ApiResult;
use crate::application::forms::RegisterForm;
use crate::application::ports::SessionGateway;
use crate::domain::entities::{LoginResponse, User};

use super::client::ApiClient;
use super::query::QueryParams;

#[derive(Clone)]
pub struct AuthApi {
    api: ApiClient,
}

impl AuthApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn register(&self, form: &RegisterForm) -> ApiResult<Value> {
        Ok(self.api.post(&["auth", "register"], form).await?.data)
    }

    pub async fn forgot_password(&self, email: &str) -> ApiResult<()> {
        let body = json!({ "email": email });
        self.api
            .execute(Method::POST, &["auth", "forgot-password"], Some(&body))
            .await
    }

    #[instrument(skip_all)]
    pub async fn reset_password(&self, token: &str, password: &str) -> ApiResult<()> {
        let body = json!({ "token": token, "password": password });
        self.api
            .execute(Method::POST, &["auth", "reset-password"], Some(&body))
            .await
    }

    pub async fn verify_email(&self, token: &str) -> ApiResult<()> {
        let body = json!({ "token": token });
        self.api
            .execute(Method::POST, &["auth", "verify-email"], Some(&body))
            .await
    }

    /// The signed-in user as the backend currently sees it.
    pub async fn me(&self) -> ApiResult<User> {
        Ok(self.api.get(&["auth", "me"], &QueryParams::new()).await?.data)
    }
}

#[async_trait]
impl SessionGateway for AuthApi {
    #[instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let body = json!({ "email": email, "password": password });
        Ok(self.api.post(&["auth", "login"], &body).await?.data)
    }

    async fn logout(&self) -> ApiResult<()> {
        self.api
            .execute(Method::POST, &["auth", "logout"], None)
            .await
    }
}
