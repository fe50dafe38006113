use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;

use crate::app_error::ApiResult;

use super::client::{ApiClient, Paginated};
use super::query::QueryParams;

#[derive(Debug, Deserialize)]
struct UnreadCount {
    count: u64,
}

#[derive(Clone)]
pub struct NotificationsApi {
    api: ApiClient,
}

impl NotificationsApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, params: &QueryParams) -> ApiResult<Paginated<Value>> {
        self.api.get(&["notifications"], params).await
    }

    pub async fn mark_read(&self, id: &str) -> ApiResult<()> {
        self.api
            .execute(Method::PATCH, &["notifications", id, "read"], None)
            .await
    }

    pub async fn mark_all_read(&self) -> ApiResult<()> {
        self.api
            .execute(Method::PATCH, &["notifications", "read-all"], None)
            .await
    }

    pub async fn unread_count(&self) -> ApiResult<u64> {
        let envelope = self
            .api
            .get::<UnreadCount>(&["notifications", "unread-count"], &QueryParams::new())
            .await?;
        Ok(envelope.data.count)
    }
}
