//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use serde_json::{Value, json};

use crate::application::use_cases::session::SessionSnapshot;
use crate::domain::entities::{Account, Role, SubscriptionStatus, User};

pub const TEST_ACCESS_TOKEN: &str = "access-token-1";
pub const TEST_REFRESH_TOKEN: &str = "refresh-token-1";

/// Create a test user with sensible defaults.
pub fn create_test_user(overrides: impl FnOnce(&mut User)) -> User {
    let mut user = User {
        id: "user-1".to_string(),
        first_name: "Marina".to_string(),
        last_name: "Costa".to_string(),
        email: "marina@clinic.test".to_string(),
        role: Role::User,
        permissions: BTreeMap::new(),
    };
    overrides(&mut user);
    user
}

/// Create a test account with sensible defaults.
pub fn create_test_account(overrides: impl FnOnce(&mut Account)) -> Account {
    let mut account = Account {
        id: "account-1".to_string(),
        name: "Clínica Veterinária Campo Verde".to_string(),
        plan: "professional".to_string(),
        subscription_status: SubscriptionStatus::Active,
        trial_ends_at: Some(Utc.with_ymd_and_hms(2026, 11, 1, 12, 0, 0).unwrap()),
    };
    overrides(&mut account);
    account
}

/// JSON body of a successful login for the given user and account.
pub fn login_response_json(user: &User, account: &Account) -> Value {
    json!({
        "user": user,
        "account": account,
        "tokens": {
            "accessToken": TEST_ACCESS_TOKEN,
            "refreshToken": TEST_REFRESH_TOKEN,
        }
    })
}

/// An authenticated snapshot with the given role and subscription status.
pub fn authenticated_snapshot(role: Role, status: SubscriptionStatus) -> SessionSnapshot {
    SessionSnapshot::authenticated(
        create_test_user(|u| u.role = role),
        Some(create_test_account(|a| a.subscription_status = status)),
    )
}
