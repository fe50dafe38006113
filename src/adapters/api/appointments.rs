use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Value, json};

use crate::app_error::ApiResult;
use crate::domain::entities::AppointmentStatus;

use super::client::ApiClient;
use super::query::QueryParams;
use super::resource::{Crud, member};

const BASE: &[&str] = &["appointments"];

#[derive(Clone)]
pub struct AppointmentsApi {
    api: ApiClient,
}

impl AppointmentsApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn update_status(&self, id: &str, status: AppointmentStatus) -> ApiResult<Value> {
        let mut path = member(BASE, id);
        path.push("status");
        let body = json!({ "status": status });
        Ok(self.api.patch(&path, &body).await?.data)
    }

    /// Appointments scheduled between `start` and `end`, both inclusive.
    pub async fn by_date_range(&self, start: NaiveDate, end: NaiveDate) -> ApiResult<Vec<Value>> {
        let query = QueryParams::new()
            .with("startDate", start)
            .with("endDate", end);
        Ok(self.api.get(&["appointments", "calendar"], &query).await?.data)
    }
}

#[async_trait]
impl Crud for AppointmentsApi {
    fn api(&self) -> &ApiClient {
        &self.api
    }

    fn base(&self) -> &'static [&'static str] {
        BASE
    }
}
