use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::app_error::ApiResult;

use super::client::ApiClient;
use super::query::QueryParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ReportKind {
    Financial,
    Appointments,
    Clients,
    Animals,
    Reproductive,
    Sanitary,
}

#[derive(Clone)]
pub struct ReportsApi {
    api: ApiClient,
}

impl ReportsApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get(&self, kind: ReportKind, params: &QueryParams) -> ApiResult<Value> {
        Ok(self.api.get(&["reports", kind.as_ref()], params).await?.data)
    }
}
