//! REST client for the practice-management backend.
//!
//! One API object per backend resource, all sharing a single [`ApiClient`].
//! Nothing here retries or reshapes data; errors propagate to the caller.

pub mod appointments;
pub mod auth;
pub mod client;
pub mod dashboard;
pub mod financial;
pub mod notifications;
pub mod query;
pub mod reports;
pub mod resource;
pub mod subscription;
pub mod users;

pub use appointments::AppointmentsApi;
pub use auth::AuthApi;
pub use client::{ApiClient, DEFAULT_API_BASE, Envelope, Paginated};
pub use dashboard::DashboardApi;
pub use financial::{FinancialApi, InvoicesApi};
pub use notifications::NotificationsApi;
pub use query::{QueryParams, QueryValue};
pub use reports::{ReportKind, ReportsApi};
pub use resource::{Crud, ResourceApi};
pub use subscription::SubscriptionApi;
pub use users::UsersApi;

impl ApiClient {
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    pub fn clients(&self) -> ResourceApi {
        ResourceApi::new(self.clone(), &["clients"])
    }

    pub fn animals(&self) -> ResourceApi {
        ResourceApi::new(self.clone(), &["animals"])
    }

    pub fn batches(&self) -> ResourceApi {
        ResourceApi::new(self.clone(), &["batches"])
    }

    pub fn appointments(&self) -> AppointmentsApi {
        AppointmentsApi::new(self.clone())
    }

    pub fn services(&self) -> ResourceApi {
        ResourceApi::new(self.clone(), &["services"])
    }

    pub fn reproductive(&self) -> ResourceApi {
        ResourceApi::new(self.clone(), &["reproductive"])
    }

    pub fn sanitary(&self) -> ResourceApi {
        ResourceApi::new(self.clone(), &["sanitary"])
    }

    pub fn financial(&self) -> FinancialApi {
        FinancialApi::new(self.clone())
    }

    pub fn invoices(&self) -> InvoicesApi {
        InvoicesApi::new(self.clone())
    }

    pub fn reports(&self) -> ReportsApi {
        ReportsApi::new(self.clone())
    }

    pub fn subscription(&self) -> SubscriptionApi {
        SubscriptionApi::new(self.clone())
    }

    pub fn notifications(&self) -> NotificationsApi {
        NotificationsApi::new(self.clone())
    }

    pub fn users(&self) -> UsersApi {
        UsersApi::new(self.clone())
    }

    pub fn dashboard(&self) -> DashboardApi {
        DashboardApi::new(self.clone())
    }
}
