use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::app_error::ApiResult;

use super::client::ApiClient;
use super::query::QueryParams;
use super::resource::{Crud, ResourceApi, member};

const INVOICES: &[&str] = &["invoices"];

// ============================================================================
// Financial
// ============================================================================

#[derive(Clone)]
pub struct FinancialApi {
    api: ApiClient,
}

impl FinancialApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Income, expenses and balance for the period in `params` (`startDate`, `endDate`).
    pub async fn summary(&self, params: &QueryParams) -> ApiResult<Value> {
        Ok(self.api.get(&["financial", "summary"], params).await?.data)
    }

    pub fn transactions(&self) -> ResourceApi {
        ResourceApi::new(self.api.clone(), &["financial", "transactions"])
    }
}

// ============================================================================
// Invoices
// ============================================================================

#[derive(Clone)]
pub struct InvoicesApi {
    api: ApiClient,
}

impl InvoicesApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Record payment; `payment` carries method and paid date when given.
    pub async fn mark_paid(&self, id: &str, payment: Option<&Value>) -> ApiResult<()> {
        let mut path = member(INVOICES, id);
        path.push("pay");
        self.api.execute(Method::PATCH, &path, payment).await
    }

    pub async fn cancel(&self, id: &str) -> ApiResult<()> {
        let mut path = member(INVOICES, id);
        path.push("cancel");
        self.api.execute(Method::PATCH, &path, None).await
    }
}

#[async_trait]
impl Crud for InvoicesApi {
    fn api(&self) -> &ApiClient {
        &self.api
    }

    fn base(&self) -> &'static [&'static str] {
        INVOICES
    }
}
