use async_trait::async_trait;
use serde_json::Value;

use crate::app_error::ApiResult;

use super::client::{ApiClient, Paginated};
use super::query::QueryParams;

/// The five calls every record collection supports.
///
/// Implementors only name their collection; the HTTP mapping is shared:
/// `GET /base`, `GET /base/:id`, `POST /base`, `PUT /base/:id`, `DELETE /base/:id`.
#[async_trait]
pub trait Crud: Send + Sync {
    fn api(&self) -> &ApiClient;

    /// Path segments of the collection, e.g. `["financial", "transactions"]`.
    fn base(&self) -> &'static [&'static str];

    async fn list(&self, params: &QueryParams) -> ApiResult<Paginated<Value>> {
        self.api().get(self.base(), params).await
    }

    async fn get(&self, id: &str) -> ApiResult<Value> {
        let path = member(self.base(), id);
        Ok(self.api().get(&path, &QueryParams::new()).await?.data)
    }

    async fn create(&self, body: &Value) -> ApiResult<Value> {
        Ok(self.api().post(self.base(), body).await?.data)
    }

    async fn update(&self, id: &str, body: &Value) -> ApiResult<Value> {
        let path = member(self.base(), id);
        Ok(self.api().put(&path, body).await?.data)
    }

    async fn delete(&self, id: &str) -> ApiResult<()> {
        self.api().delete(&member(self.base(), id)).await
    }
}

/// Segments addressing one record (and optionally an action on it).
pub fn member<'a>(base: &[&'a str], id: &'a str) -> Vec<&'a str> {
    let mut path = base.to_vec();
    path.push(id);
    path
}

/// A collection with no calls beyond [`Crud`].
#[derive(Clone)]
pub struct ResourceApi {
    api: ApiClient,
    base: &'static [&'static str],
}

impl ResourceApi {
    pub fn new(api: ApiClient, base: &'static [&'static str]) -> Self {
        Self { api, base }
    }
}

#[async_trait]
impl Crud for ResourceApi {
    fn api(&self) -> &ApiClient {
        &self.api
    }

    fn base(&self) -> &'static [&'static str] {
        self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_path() {
        assert_eq!(member(&["clients"], "c1"), ["clients", "c1"]);
        assert_eq!(
            member(&["financial", "transactions"], "t9"),
            ["financial", "transactions", "t9"]
        );
    }
}
