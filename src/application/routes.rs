//! The application's fixed route table.

use crate::domain::entities::Role;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const SUBSCRIPTION_PATH: &str = "/subscription";
pub const PROFILE_PATH: &str = "/settings/profile";

const OWNER_OR_ADMIN: &[Role] = &[Role::Owner, Role::Admin];

/// Access a protected route asks for on top of a signed-in, subscribed session.
/// An empty `roles` slice means no role restriction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Requirement<'a> {
    pub roles: &'a [Role],
    pub permission: Option<&'a str>,
}

impl<'a> Requirement<'a> {
    pub const NONE: Requirement<'static> = Requirement {
        roles: &[],
        permission: None,
    };

    pub fn roles(roles: &'a [Role]) -> Self {
        Self {
            roles,
            permission: None,
        }
    }

    pub fn permission(permission: &'a str) -> Self {
        Self {
            roles: &[],
            permission: Some(permission),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    ForgotPassword,
    ResetPassword,
    VerifyEmail,
    Root,
    Dashboard,
    Clients,
    ClientDetail(String),
    Animals,
    AnimalDetail(String),
    Batches,
    BatchDetail(String),
    Appointments,
    Services,
    Reproductive,
    Sanitary,
    Financial,
    Invoices,
    InvoiceDetail(String),
    Reports,
    Subscription,
    Notifications,
    Profile,
    Users,
    NotFound,
}

impl Route {
    /// Match a location (path with optional query string or fragment) against the table.
    pub fn resolve(location: &str) -> Route {
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Root,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["forgot-password"] => Route::ForgotPassword,
            ["reset-password"] => Route::ResetPassword,
            ["verify-email"] => Route::VerifyEmail,
            ["dashboard"] => Route::Dashboard,
            ["clients"] => Route::Clients,
            ["clients", id] => Route::ClientDetail((*id).to_string()),
            ["animals"] => Route::Animals,
            ["animals", id] => Route::AnimalDetail((*id).to_string()),
            ["batches"] => Route::Batches,
            ["batches", id] => Route::BatchDetail((*id).to_string()),
            ["appointments"] => Route::Appointments,
            ["services"] => Route::Services,
            ["reproductive"] => Route::Reproductive,
            ["sanitary"] => Route::Sanitary,
            ["financial"] => Route::Financial,
            ["invoices"] => Route::Invoices,
            ["invoices", id] => Route::InvoiceDetail((*id).to_string()),
            ["reports"] => Route::Reports,
            ["subscription"] => Route::Subscription,
            ["notifications"] => Route::Notifications,
            ["settings", "profile"] => Route::Profile,
            ["users"] => Route::Users,
            _ => Route::NotFound,
        }
    }

    /// Canonical path of the route. `NotFound` has none.
    pub fn path(&self) -> Option<String> {
        let path = match self {
            Route::Login => LOGIN_PATH.to_string(),
            Route::Register => "/register".to_string(),
            Route::ForgotPassword => "/forgot-password".to_string(),
            Route::ResetPassword => "/reset-password".to_string(),
            Route::VerifyEmail => "/verify-email".to_string(),
            Route::Root => "/".to_string(),
            Route::Dashboard => DASHBOARD_PATH.to_string(),
            Route::Clients => "/clients".to_string(),
            Route::ClientDetail(id) => format!("/clients/{id}"),
            Route::Animals => "/animals".to_string(),
            Route::AnimalDetail(id) => format!("/animals/{id}"),
            Route::Batches => "/batches".to_string(),
            Route::BatchDetail(id) => format!("/batches/{id}"),
            Route::Appointments => "/appointments".to_string(),
            Route::Services => "/services".to_string(),
            Route::Reproductive => "/reproductive".to_string(),
            Route::Sanitary => "/sanitary".to_string(),
            Route::Financial => "/financial".to_string(),
            Route::Invoices => "/invoices".to_string(),
            Route::InvoiceDetail(id) => format!("/invoices/{id}"),
            Route::Reports => "/reports".to_string(),
            Route::Subscription => SUBSCRIPTION_PATH.to_string(),
            Route::Notifications => "/notifications".to_string(),
            Route::Profile => PROFILE_PATH.to_string(),
            Route::Users => "/users".to_string(),
            Route::NotFound => return None,
        };
        Some(path)
    }

    /// Sign-in, registration and password recovery pages.
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Route::Login
                | Route::Register
                | Route::ForgotPassword
                | Route::ResetPassword
                | Route::VerifyEmail
        )
    }

    /// Pages inside the authenticated shell.
    pub fn is_protected(&self) -> bool {
        !self.is_public() && !matches!(self, Route::Root | Route::NotFound)
    }

    /// Pages reachable without an active subscription, so a lapsed account can fix billing.
    pub fn is_subscription_exempt(&self) -> bool {
        matches!(self, Route::Subscription | Route::Profile)
    }

    pub fn requirement(&self) -> Requirement<'static> {
        match self {
            Route::Users => Requirement::roles(OWNER_OR_ADMIN),
            Route::Financial | Route::Invoices | Route::InvoiceDetail(_) => {
                Requirement::permission("financial")
            }
            Route::Reports => Requirement::permission("reports"),
            _ => Requirement::NONE,
        }
    }
}
