use reqwest::Method;
use serde_json::{Value, json};

use crate::app_error::ApiResult;

use super::client::ApiClient;
use super::query::QueryParams;

#[derive(Clone)]
pub struct SubscriptionApi {
    api: ApiClient,
}

impl SubscriptionApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn current(&self) -> ApiResult<Value> {
        Ok(self.api.get(&["subscription"], &QueryParams::new()).await?.data)
    }

    pub async fn plans(&self) -> ApiResult<Vec<Value>> {
        Ok(self
            .api
            .get(&["subscription", "plans"], &QueryParams::new())
            .await?
            .data)
    }

    /// Start a hosted checkout for `plan_id`; the response carries the checkout URL.
    pub async fn checkout(&self, plan_id: &str) -> ApiResult<Value> {
        let body = json!({ "planId": plan_id });
        Ok(self.api.post(&["subscription", "checkout"], &body).await?.data)
    }

    pub async fn cancel(&self) -> ApiResult<()> {
        self.api
            .execute(Method::POST, &["subscription", "cancel"], None)
            .await
    }
}
