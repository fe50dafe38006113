//! Access decisions for the authenticated application shell.
//!
//! Everything here is a pure function of a [`SessionSnapshot`] and a requested
//! location, so the same inputs always produce the same decision.

use crate::application::routes::{
    DASHBOARD_PATH, LOGIN_PATH, Requirement, Route, SUBSCRIPTION_PATH,
};
use crate::application::use_cases::session::SessionSnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// The session is still being restored; show a placeholder.
    ShowLoading,
    /// Go to `to`. `from` is the originally requested location, kept so the
    /// user can be sent back after signing in.
    Redirect { to: String, from: Option<String> },
}

impl GuardDecision {
    fn redirect(to: &str) -> Self {
        GuardDecision::Redirect {
            to: to.to_string(),
            from: None,
        }
    }
}

/// Decide whether `location` may render for this session.
///
/// Checks run in order: loading, authentication, subscription (the
/// subscription and profile pages are exempt), role, permission.
pub fn guard(
    session: &SessionSnapshot,
    location: &str,
    requirement: Requirement<'_>,
) -> GuardDecision {
    decide(session, &Route::resolve(location), location, requirement)
}

/// Guard an already resolved route with its table requirement.
///
/// Callers that build the route from parts (e.g. a record id) use this instead
/// of formatting a path and resolving it again. Anything outside the protected
/// part of the table is refused with a redirect to the dashboard.
pub fn guard_route(session: &SessionSnapshot, route: &Route) -> GuardDecision {
    let location = route.path().unwrap_or_default();
    if !route.is_protected() {
        if session.is_loading {
            return GuardDecision::ShowLoading;
        }
        return GuardDecision::redirect(DASHBOARD_PATH);
    }
    decide(session, route, &location, route.requirement())
}

fn decide(
    session: &SessionSnapshot,
    route: &Route,
    location: &str,
    requirement: Requirement<'_>,
) -> GuardDecision {
    if session.is_loading {
        return GuardDecision::ShowLoading;
    }

    if !session.is_authenticated {
        return GuardDecision::Redirect {
            to: LOGIN_PATH.to_string(),
            from: Some(location.to_string()),
        };
    }

    if !session.has_active_subscription() && !route.is_subscription_exempt() {
        return GuardDecision::redirect(SUBSCRIPTION_PATH);
    }

    if !requirement.roles.is_empty() && !session.has_role(requirement.roles) {
        return GuardDecision::redirect(DASHBOARD_PATH);
    }

    if let Some(permission) = requirement.permission {
        if !session.has_permission(permission) {
            return GuardDecision::redirect(DASHBOARD_PATH);
        }
    }

    GuardDecision::Allow
}

/// Result of navigating to a location: the matched route and what to do with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    pub decision: GuardDecision,
}

/// Resolve `location` against the route table and apply the guard where it belongs.
///
/// Protected pages go through [`guard`] with their table requirement. Public
/// auth pages send an already signed-in user to the dashboard. `/` redirects
/// to the dashboard. Unknown paths render the not-found page.
pub fn navigate(session: &SessionSnapshot, location: &str) -> Navigation {
    let route = Route::resolve(location);
    let decision = match &route {
        Route::NotFound => GuardDecision::Allow,
        Route::Root => GuardDecision::redirect(DASHBOARD_PATH),
        r if r.is_public() => {
            if session.is_loading {
                GuardDecision::ShowLoading
            } else if session.is_authenticated {
                GuardDecision::redirect(DASHBOARD_PATH)
            } else {
                GuardDecision::Allow
            }
        }
        r => guard(session, location, r.requirement()),
    };
    Navigation { route, decision }
}

/// Where to go after a successful sign-in: the remembered location when it
/// is an app-relative path inside the application, the dashboard otherwise.
/// `//host` is protocol-relative in a browser and never accepted.
pub fn post_login_destination(from: Option<&str>) -> String {
    match from {
        Some(location)
            if location.starts_with('/')
                && !location.starts_with("//")
                && Route::resolve(location).is_protected() =>
        {
            location.to_string()
        }
        _ => DASHBOARD_PATH.to_string(),
    }
}
