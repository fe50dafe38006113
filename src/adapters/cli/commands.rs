use std::io::Write;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::adapters::api::{ApiClient, Crud, Paginated, QueryParams};
use crate::app_error::{ApiError, ApiResult, SessionError};
use crate::application::forms::{
    AnimalForm, AppointmentForm, ClientForm, FormErrors, LoginForm, validate_form,
};
use crate::application::query_cache::QueryKey;
use crate::application::route_guard::{
    GuardDecision, guard_route, navigate, post_login_destination,
};
use crate::application::routes::Route;
use crate::domain::entities::{AppointmentStatus, UserUpdate};

use super::app_state::AppState;
use super::error::{CliError, CliResult};
use super::output::{OutputFormat, Printer};
use super::{Command, ResourceKind};

/// Execute one command against the application state, writing results to `out`.
pub async fn run(
    command: Command,
    format: OutputFormat,
    state: &mut AppState,
    out: &mut dyn Write,
) -> CliResult<()> {
    let mut printer = Printer::new(format, state.locale, out);

    match command {
        Command::Login {
            email,
            password,
            from,
        } => login(state, &mut printer, email, password, from).await,
        Command::Logout => {
            state.session.logout().await?;
            state.cache.clear().await;
            printer.message("Signed out.")?;
            Ok(())
        }
        Command::Whoami => whoami(state, &mut printer),
        Command::Open { path } => open(state, &mut printer, &path),
        Command::List {
            resource,
            page,
            limit,
            filters,
        } => {
            let params = QueryParams::from_pairs(filters.iter().map(String::as_str)).page(page, limit);
            list(state, &mut printer, resource, params).await
        }
        Command::Show { resource, id } => show(state, &mut printer, resource, &id).await,
        Command::Create { resource, data } => create(state, &mut printer, resource, &data).await,
        Command::Update { resource, id, data } => {
            update(state, &mut printer, resource, &id, &data).await
        }
        Command::Delete { resource, id } => delete(state, &mut printer, resource, &id).await,
        Command::AppointmentStatus { id, status } => {
            appointment_status(state, &mut printer, &id, status).await
        }
        Command::Profile {
            first_name,
            last_name,
            email,
        } => {
            let update = UserUpdate {
                first_name,
                last_name,
                email,
                ..Default::default()
            };
            profile(state, &mut printer, update).await
        }
    }
}

// ============================================================================
// Session commands
// ============================================================================

#[instrument(skip(state, printer, password))]
async fn login(
    state: &mut AppState,
    printer: &mut Printer<'_>,
    email: String,
    password: String,
    from: Option<String>,
) -> CliResult<()> {
    validate_form(&LoginForm {
        email: email.clone(),
        password: password.clone(),
    })?;

    state.session.login(&email, &password).await?;
    state.cache.clear().await;

    let name = state
        .session
        .user()
        .map(|u| u.full_name())
        .unwrap_or_default();
    let destination = post_login_destination(from.as_deref());
    info!(destination = %destination, "Signed in");

    printer.message(&format!("Signed in as {name}."))?;
    let nav = navigate(&state.session.snapshot(), &destination);
    match nav.decision {
        GuardDecision::Redirect { to, .. } => {
            printer.message(&format!("Next: {to}"))?;
        }
        _ => printer.message(&format!("Next: {destination}"))?,
    }
    Ok(())
}

fn whoami(state: &AppState, printer: &mut Printer<'_>) -> CliResult<()> {
    let session = state.session.session();
    let Some(user) = session.user.as_ref().filter(|_| session.is_authenticated) else {
        printer.message("Not signed in.")?;
        return Ok(());
    };

    let mut record = serde_json::json!({
        "name": user.full_name(),
        "email": user.email,
        "role": user.role.as_ref(),
        "api": state.config.api_base_url.as_str(),
    });
    if let Some(account) = &session.account {
        record["account"] = account.name.clone().into();
        record["plan"] = account.plan.clone().into();
        record["subscription"] = account.subscription_status.label().into();
        if let Some(days) = account.trial_days_left(Utc::now()) {
            record["trialDaysLeft"] = days.into();
        }
    }
    printer.record(&record)?;
    Ok(())
}

fn open(state: &AppState, printer: &mut Printer<'_>, path: &str) -> CliResult<()> {
    let nav = navigate(&state.session.snapshot(), path);
    let text = match nav.decision {
        GuardDecision::Allow => match nav.route.path() {
            Some(p) => format!("Allowed: {p}"),
            None => format!("Not found: {path}"),
        },
        GuardDecision::ShowLoading => "Loading".to_string(),
        GuardDecision::Redirect { to, from: Some(from) } => {
            format!("Redirect to {to} (return to {from} after sign-in)")
        }
        GuardDecision::Redirect { to, from: None } => format!("Redirect to {to}"),
    };
    printer.message(&text)?;
    Ok(())
}

async fn profile(
    state: &mut AppState,
    printer: &mut Printer<'_>,
    update: UserUpdate,
) -> CliResult<()> {
    if update.is_empty() {
        return Err(CliError::EmptyUpdate);
    }
    ensure_allowed(state, &Route::Profile)?;

    let result = state.api.users().update_me(&update).await;
    let user = handle_unauthorized(state, result)?;
    state.session.update_user(update)?;
    printer.message(&format!("Profile updated for {}.", user.full_name()))?;
    Ok(())
}

// ============================================================================
// Resource commands
// ============================================================================

fn crud(api: &ApiClient, resource: ResourceKind) -> Box<dyn Crud> {
    match resource {
        ResourceKind::Clients => Box::new(api.clients()),
        ResourceKind::Animals => Box::new(api.animals()),
        ResourceKind::Batches => Box::new(api.batches()),
        ResourceKind::Appointments => Box::new(api.appointments()),
        ResourceKind::Services => Box::new(api.services()),
        ResourceKind::Reproductive => Box::new(api.reproductive()),
        ResourceKind::Sanitary => Box::new(api.sanitary()),
        ResourceKind::Transactions => Box::new(api.financial().transactions()),
        ResourceKind::Invoices => Box::new(api.invoices()),
        ResourceKind::Users => Box::new(api.users()),
    }
}

async fn list(
    state: &mut AppState,
    printer: &mut Printer<'_>,
    resource: ResourceKind,
    params: QueryParams,
) -> CliResult<()> {
    ensure_allowed(state, &resource.route())?;

    let api = crud(&state.api, resource);
    let key = QueryKey::new(resource.name())
        .with("list")
        .with(params.to_key_segment());
    let result: ApiResult<Paginated<Value>> = state.cache.fetch(key, || api.list(&params)).await;
    let page = handle_unauthorized(state, result)?;

    printer.records(&page.data, page.pagination.as_ref())?;
    Ok(())
}

async fn show(
    state: &mut AppState,
    printer: &mut Printer<'_>,
    resource: ResourceKind,
    id: &str,
) -> CliResult<()> {
    ensure_allowed(state, &resource.detail_route(id))?;

    let api = crud(&state.api, resource);
    let key = QueryKey::new(resource.name()).with(id);
    let result = state.cache.fetch(key, || api.get(id)).await;
    let record = handle_unauthorized(state, result)?;

    printer.record(&record)?;
    Ok(())
}

async fn create(
    state: &mut AppState,
    printer: &mut Printer<'_>,
    resource: ResourceKind,
    data: &str,
) -> CliResult<()> {
    ensure_allowed(state, &resource.route())?;
    let body: Value = serde_json::from_str(data).map_err(CliError::InvalidData)?;
    validate_body(resource, &body)?;

    let api = crud(&state.api, resource);
    let result = state
        .cache
        .mutate(api.create(&body), &[QueryKey::new(resource.name())])
        .await;
    let record = handle_rejected(state, result)?;

    printer.record(&record)?;
    Ok(())
}

async fn update(
    state: &mut AppState,
    printer: &mut Printer<'_>,
    resource: ResourceKind,
    id: &str,
    data: &str,
) -> CliResult<()> {
    ensure_allowed(state, &resource.detail_route(id))?;
    let body: Value = serde_json::from_str(data).map_err(CliError::InvalidData)?;

    let api = crud(&state.api, resource);
    let result = state
        .cache
        .mutate(api.update(id, &body), &[QueryKey::new(resource.name())])
        .await;
    let record = handle_rejected(state, result)?;

    printer.record(&record)?;
    Ok(())
}

async fn delete(
    state: &mut AppState,
    printer: &mut Printer<'_>,
    resource: ResourceKind,
    id: &str,
) -> CliResult<()> {
    ensure_allowed(state, &resource.detail_route(id))?;

    let api = crud(&state.api, resource);
    let result = state
        .cache
        .mutate(api.delete(id), &[QueryKey::new(resource.name())])
        .await;
    handle_unauthorized(state, result)?;

    printer.message(&format!("Deleted {} {id}.", resource.name()))?;
    Ok(())
}

async fn appointment_status(
    state: &mut AppState,
    printer: &mut Printer<'_>,
    id: &str,
    status: AppointmentStatus,
) -> CliResult<()> {
    ensure_allowed(state, &ResourceKind::Appointments.route())?;

    let api = state.api.appointments();
    let current = handle_unauthorized(state, api.get(id).await)?;
    let from = current_status(&current)?;
    if !from.can_transition_to(status) {
        return Err(CliError::InvalidTransition { from, to: status });
    }

    let result = state
        .cache
        .mutate(
            api.update_status(id, status),
            &[QueryKey::new(ResourceKind::Appointments.name())],
        )
        .await;
    handle_rejected(state, result)?;

    printer.message(&format!("Appointment {id} is now {}.", status.label()))?;
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Run the route guard for `route`; anything but Allow refuses the command.
fn ensure_allowed(state: &AppState, route: &Route) -> CliResult<()> {
    match guard_route(&state.session.snapshot(), route) {
        GuardDecision::Allow => Ok(()),
        GuardDecision::Redirect { to, .. } => Err(CliError::Denied {
            path: route.path().unwrap_or_default(),
            to,
        }),
        GuardDecision::ShowLoading => Err(CliError::Session(SessionError::NotAuthenticated)),
    }
}

/// A 401 means the stored token is no longer accepted: drop the local session.
fn handle_unauthorized<T>(state: &mut AppState, result: ApiResult<T>) -> CliResult<T> {
    match result {
        Err(e) if e.is_unauthorized() => {
            warn!("Stored session rejected by the API, signing out locally");
            state.session.expire()?;
            Err(CliError::SessionExpired)
        }
        other => Ok(other?),
    }
}

/// Like [`handle_unauthorized`], but field errors from a rejected submission
/// are reported per field.
fn handle_rejected<T>(state: &mut AppState, result: ApiResult<T>) -> CliResult<T> {
    match result {
        Err(e @ ApiError::Http { .. }) if !e.is_unauthorized() => {
            let errors = FormErrors::from_api(&e);
            if errors.is_empty() {
                Err(e.into())
            } else {
                Err(errors.into())
            }
        }
        other => handle_unauthorized(state, other),
    }
}

fn current_status(appointment: &Value) -> CliResult<AppointmentStatus> {
    serde_json::from_value(appointment["status"].clone())
        .map_err(|e| ApiError::Decode(format!("appointment status: {e}")).into())
}

fn validate_body(resource: ResourceKind, body: &Value) -> CliResult<()> {
    match resource {
        ResourceKind::Clients => check::<ClientForm>(body),
        ResourceKind::Animals => check::<AnimalForm>(body),
        ResourceKind::Appointments => check::<AppointmentForm>(body),
        _ => Ok(()),
    }
}

fn check<F: DeserializeOwned + Validate>(body: &Value) -> CliResult<()> {
    let form: F = serde_json::from_value(body.clone()).map_err(CliError::InvalidData)?;
    validate_form(&form)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use url::Url;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, method, path},
    };

    use super::*;
    use crate::adapters::storage::MemoryStore;
    use crate::application::formatters::Locale;
    use crate::application::ports::KeyValueStore;
    use crate::application::query_cache::{QueryCache, QueryConfig};
    use crate::application::use_cases::session::SessionStore;
    use crate::domain::entities::{Role, SubscriptionStatus};
    use crate::infra::config::AppConfig;
    use crate::test_utils::*;

    fn state_with(gateway: InMemorySessionGateway) -> AppState {
        state_sharing(Arc::new(gateway))
    }

    /// State whose API points nowhere; guard refusals must happen before any request.
    fn state_sharing(gateway: Arc<InMemorySessionGateway>) -> AppState {
        state_at(gateway, "http://127.0.0.1:9/api/v1")
    }

    fn state_at(gateway: Arc<InMemorySessionGateway>, base_url: &str) -> AppState {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let config = AppConfig::from_vars(|_, default| default.to_string()).unwrap();
        let api = ApiClient::new(
            reqwest::Client::new(),
            Url::parse(base_url).unwrap(),
            storage.clone(),
        );
        let mut session = SessionStore::new(storage.clone(), gateway);
        session.initialize();
        AppState {
            config: Arc::new(config),
            storage,
            api,
            session,
            cache: QueryCache::new(QueryConfig::default()),
            locale: Locale::PtBr,
        }
    }

    async fn run_to_string(state: &mut AppState, command: Command) -> (CliResult<()>, String) {
        let mut buf = Vec::new();
        let result = run(command, OutputFormat::Human, state, &mut buf).await;
        (result, String::from_utf8(buf).unwrap())
    }

    fn login_command(from: Option<&str>) -> Command {
        Command::Login {
            email: "marina@clinic.test".into(),
            password: "pw".into(),
            from: from.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_list_requires_sign_in() {
        let mut state = state_with(InMemorySessionGateway::rejecting());
        let (result, _) = run_to_string(
            &mut state,
            Command::List {
                resource: ResourceKind::Clients,
                page: 1,
                limit: 20,
                filters: vec![],
            },
        )
        .await;

        match result {
            Err(CliError::Denied { path, to }) => {
                assert_eq!(path, "/clients");
                assert_eq!(to, "/login");
            }
            other => panic!("expected denial, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_login_then_open_remembered_page() {
        let user = create_test_user(|_| {});
        let account = create_test_account(|_| {});
        let mut state = state_with(InMemorySessionGateway::succeeding(login_response_json(
            &user, &account,
        )));

        let (result, out) = run_to_string(&mut state, login_command(Some("/clients"))).await;
        result.unwrap();
        assert!(out.contains("Signed in as Marina Costa."));
        assert!(out.contains("Next: /clients"));

        let (_, out) = run_to_string(&mut state, Command::Open { path: "/clients".into() }).await;
        assert_eq!(out, "Allowed: /clients\n");
    }

    #[tokio::test]
    async fn test_login_validates_before_calling_api() {
        let gateway = Arc::new(InMemorySessionGateway::rejecting());
        let mut state = state_sharing(gateway.clone());
        let (result, _) = run_to_string(
            &mut state,
            Command::Login {
                email: "not-an-email".into(),
                password: String::new(),
                from: None,
            },
        )
        .await;

        assert!(matches!(result, Err(CliError::Form(_))));
        assert_eq!(
            gateway.login_calls.load(std::sync::atomic::Ordering::SeqCst),
            0
        );
    }

    #[tokio::test]
    async fn test_rejected_login_reports_api_message() {
        let mut state = state_with(InMemorySessionGateway::rejecting());
        let (result, _) = run_to_string(&mut state, login_command(None)).await;
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password");
        assert!(!state.session.is_authenticated());
    }

    #[tokio::test]
    async fn test_lapsed_account_is_sent_to_subscription() {
        let user = create_test_user(|u| u.role = Role::Owner);
        let account = create_test_account(|a| a.subscription_status = SubscriptionStatus::Unpaid);
        let mut state = state_with(InMemorySessionGateway::succeeding(login_response_json(
            &user, &account,
        )));
        run_to_string(&mut state, login_command(None)).await.0.unwrap();

        let (result, _) = run_to_string(
            &mut state,
            Command::Show {
                resource: ResourceKind::Animals,
                id: "a1".into(),
            },
        )
        .await;
        assert!(matches!(
            result,
            Err(CliError::Denied { ref to, .. }) if to == "/subscription"
        ));

        let (_, out) = run_to_string(&mut state, Command::Open { path: "/settings/profile".into() }).await;
        assert_eq!(out, "Allowed: /settings/profile\n");
    }

    #[tokio::test]
    async fn test_create_validates_body() {
        let user = create_test_user(|_| {});
        let account = create_test_account(|_| {});
        let mut state = state_with(InMemorySessionGateway::succeeding(login_response_json(
            &user, &account,
        )));
        run_to_string(&mut state, login_command(None)).await.0.unwrap();

        let (result, _) = run_to_string(
            &mut state,
            Command::Create {
                resource: ResourceKind::Clients,
                data: r#"{"name":"Jo","phone":"123"}"#.into(),
            },
        )
        .await;
        match result {
            Err(CliError::Form(errors)) => assert_eq!(errors.fields().collect::<Vec<_>>(), ["phone"]),
            other => panic!("expected form errors, got {other:?}"),
        }

        let (result, _) = run_to_string(
            &mut state,
            Command::Create {
                resource: ResourceKind::Clients,
                data: "{not json".into(),
            },
        )
        .await;
        assert!(matches!(result, Err(CliError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_whoami_and_logout() {
        let user = create_test_user(|_| {});
        let account = create_test_account(|_| {});
        let mut state = state_with(InMemorySessionGateway::succeeding(login_response_json(
            &user, &account,
        )));
        run_to_string(&mut state, login_command(None)).await.0.unwrap();

        let (_, out) = run_to_string(&mut state, Command::Whoami).await;
        assert!(out.contains("Marina Costa"));
        assert!(out.contains("Clínica Veterinária Campo Verde"));

        let (result, out) = run_to_string(&mut state, Command::Logout).await;
        result.unwrap();
        assert_eq!(out, "Signed out.\n");
        assert!(state.storage.get("access_token").unwrap().is_none());

        let (_, out) = run_to_string(&mut state, Command::Whoami).await;
        assert_eq!(out, "Not signed in.\n");
    }

    #[tokio::test]
    async fn test_empty_profile_update_is_refused() {
        let mut state = state_with(InMemorySessionGateway::rejecting());
        let (result, _) = run_to_string(
            &mut state,
            Command::Profile {
                first_name: None,
                last_name: None,
                email: None,
            },
        )
        .await;
        assert!(matches!(result, Err(CliError::EmptyUpdate)));
    }

    async fn signed_in_at(base_url: &str) -> AppState {
        let user = create_test_user(|_| {});
        let account = create_test_account(|_| {});
        let gateway = InMemorySessionGateway::succeeding(login_response_json(&user, &account));
        let mut state = state_at(Arc::new(gateway), base_url);
        run_to_string(&mut state, login_command(None)).await.0.unwrap();
        state
    }

    #[tokio::test]
    async fn test_record_id_with_slash_cannot_skip_permission_check() {
        let user = create_test_user(|_| {});
        let account = create_test_account(|_| {});
        let mut state = state_with(InMemorySessionGateway::succeeding(login_response_json(
            &user, &account,
        )));
        run_to_string(&mut state, login_command(None)).await.0.unwrap();

        let commands = [
            Command::Show {
                resource: ResourceKind::Invoices,
                id: "i1/x".into(),
            },
            Command::Update {
                resource: ResourceKind::Invoices,
                id: "i1/x".into(),
                data: "{}".into(),
            },
            Command::Delete {
                resource: ResourceKind::Invoices,
                id: "i1/x".into(),
            },
        ];
        for command in commands {
            let (result, _) = run_to_string(&mut state, command).await;
            match result {
                Err(CliError::Denied { path, to }) => {
                    assert_eq!(path, "/invoices/i1/x");
                    assert_eq!(to, "/dashboard");
                }
                other => panic!("expected denial, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_invalid_appointment_transition_is_refused_before_patch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/appointments/ap1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "id": "ap1", "status": "completed" }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/api/v1/appointments/ap1/status"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut state = signed_in_at(&format!("{}/api/v1", server.uri())).await;
        let (result, _) = run_to_string(
            &mut state,
            Command::AppointmentStatus {
                id: "ap1".into(),
                status: AppointmentStatus::Scheduled,
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(CliError::InvalidTransition {
                from: AppointmentStatus::Completed,
                to: AppointmentStatus::Scheduled,
            })
        ));
    }

    #[tokio::test]
    async fn test_valid_appointment_transition_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/appointments/ap2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "id": "ap2", "status": "confirmed" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/api/v1/appointments/ap2/status"))
            .and(body_json(serde_json::json!({ "status": "in_progress" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "id": "ap2", "status": "in_progress" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut state = signed_in_at(&format!("{}/api/v1", server.uri())).await;
        let (result, out) = run_to_string(
            &mut state,
            Command::AppointmentStatus {
                id: "ap2".into(),
                status: AppointmentStatus::InProgress,
            },
        )
        .await;

        result.unwrap();
        assert_eq!(out, "Appointment ap2 is now In progress.\n");
    }
}
