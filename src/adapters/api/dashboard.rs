use serde_json::Value;

use crate::app_error::ApiResult;

use super::client::ApiClient;
use super::query::QueryParams;

#[derive(Clone)]
pub struct DashboardApi {
    api: ApiClient,
}

impl DashboardApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn stats(&self) -> ApiResult<Value> {
        Ok(self
            .api
            .get(&["dashboard", "stats"], &QueryParams::new())
            .await?
            .data)
    }
}
