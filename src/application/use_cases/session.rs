use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing::{info, instrument, warn};

use crate::app_error::{SessionError, StorageError};
use crate::application::ports::{KeyValueStore, SessionGateway};
use crate::domain::entities::{Account, AccountUpdate, LoginResponse, Role, User, UserUpdate};

// ============================================================================
// Persisted keys
// ============================================================================

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_KEY: &str = "user";
pub const ACCOUNT_KEY: &str = "account";

/// Every key the session owns in persisted storage.
pub const SESSION_KEYS: [&str; 4] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY, ACCOUNT_KEY];

// ============================================================================
// Snapshot
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Unauthenticated,
    Authenticated,
}

/// Read-only view of the session, handed to the route guard and to views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub account: Option<Account>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

impl SessionSnapshot {
    /// State before `initialize` has run.
    pub fn loading() -> Self {
        Self {
            user: None,
            account: None,
            is_authenticated: false,
            is_loading: true,
        }
    }

    pub fn unauthenticated() -> Self {
        Self {
            is_loading: false,
            ..Self::loading()
        }
    }

    pub fn authenticated(user: User, account: Option<Account>) -> Self {
        Self {
            user: Some(user),
            account,
            is_authenticated: true,
            is_loading: false,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.is_loading {
            SessionState::Uninitialized
        } else if self.is_authenticated {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    /// True when the account's plan is active or trialing.
    pub fn has_active_subscription(&self) -> bool {
        self.account
            .as_ref()
            .is_some_and(|account| account.subscription_status.is_active())
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        self.user
            .as_ref()
            .is_some_and(|user| roles.contains(&user.role))
    }

    /// Owners and admins hold every permission; everyone else needs an explicit grant.
    pub fn has_permission(&self, name: &str) -> bool {
        self.user.as_ref().is_some_and(|user| {
            user.role.is_privileged() || user.permissions.get(name).copied().unwrap_or(false)
        })
    }
}

// ============================================================================
// Store
// ============================================================================

/// Single source of truth for who is signed in, for which account, and with
/// what access. Mirrors its state into a [`KeyValueStore`] after every change.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    gateway: Arc<dyn SessionGateway>,
    session: SessionSnapshot,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, gateway: Arc<dyn SessionGateway>) -> Self {
        Self {
            storage,
            gateway,
            session: SessionSnapshot::loading(),
        }
    }

    /// Restore the session from persisted storage. Never touches the network.
    ///
    /// Unreadable persisted data is discarded and the session starts
    /// unauthenticated; this is not reported as an error.
    #[instrument(skip(self))]
    pub fn initialize(&mut self) -> SessionState {
        self.session = match self.read_persisted() {
            Ok(Some((user, account))) => SessionSnapshot::authenticated(user, account),
            Ok(None) => SessionSnapshot::unauthenticated(),
            Err(e) => {
                warn!(error = %e, "discarding unreadable persisted session");
                if let Err(clear_err) = self.clear_persisted() {
                    warn!(error = %clear_err, "failed to clear persisted session");
                }
                SessionSnapshot::unauthenticated()
            }
        };
        self.session.state()
    }

    /// Sign in. Any previously persisted session is cleared before the request
    /// is sent, so a failed attempt leaves the user signed out.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), SessionError> {
        self.session = SessionSnapshot::unauthenticated();
        self.clear_persisted()?;

        let response = self.gateway.login(email, password).await?;

        if let Err(e) = self.persist(&response) {
            if let Err(clear_err) = self.clear_persisted() {
                warn!(error = %clear_err, "failed to roll back partially persisted session");
            }
            return Err(e.into());
        }

        info!(user_id = %response.user.id, account_id = %response.account.id, "signed in");
        self.session = SessionSnapshot::authenticated(response.user, Some(response.account));
        Ok(())
    }

    /// Sign out. The backend call is best effort; local teardown always happens.
    #[instrument(skip(self))]
    pub async fn logout(&mut self) -> Result<(), SessionError> {
        if let Err(e) = self.gateway.logout().await {
            warn!(error = %e, "sign-out request failed, clearing local session anyway");
        }
        self.expire()?;
        info!("signed out");
        Ok(())
    }

    /// Drop the local session without contacting the backend, e.g. after the
    /// API rejected the stored token.
    pub fn expire(&mut self) -> Result<(), StorageError> {
        self.session = SessionSnapshot::unauthenticated();
        self.clear_persisted()
    }

    /// Shallow-merge into the current user and persist the result.
    pub fn update_user(&mut self, update: UserUpdate) -> Result<(), SessionError> {
        let user = self
            .session
            .user
            .as_mut()
            .ok_or(SessionError::NotAuthenticated)?;
        update.apply_to(user);
        let json = serde_json::to_string(&*user).map_err(StorageError::from)?;
        self.storage.set(USER_KEY, &json)?;
        Ok(())
    }

    /// Shallow-merge into the current account and persist the result.
    pub fn update_account(&mut self, update: AccountUpdate) -> Result<(), SessionError> {
        let account = self
            .session
            .account
            .as_mut()
            .ok_or(SessionError::NotAuthenticated)?;
        update.apply_to(account);
        let json = serde_json::to_string(&*account).map_err(StorageError::from)?;
        self.storage.set(ACCOUNT_KEY, &json)?;
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.clone()
    }

    pub fn session(&self) -> &SessionSnapshot {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user.as_ref()
    }

    pub fn account(&self) -> Option<&Account> {
        self.session.account.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.session.is_loading
    }

    pub fn has_active_subscription(&self) -> bool {
        self.session.has_active_subscription()
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        self.session.has_role(roles)
    }

    pub fn has_permission(&self, name: &str) -> bool {
        self.session.has_permission(name)
    }

    // ========================================================================
    // Persistence helpers
    // ========================================================================

    fn read_persisted(&self) -> Result<Option<(User, Option<Account>)>, StorageError> {
        let token = self
            .storage
            .get(ACCESS_TOKEN_KEY)?
            .filter(|token| !token.is_empty());
        let raw_user = self.storage.get(USER_KEY)?;

        let (Some(_), Some(raw_user)) = (token, raw_user) else {
            return Ok(None);
        };

        let user: User = serde_json::from_str(&raw_user)?;
        let account = match self.storage.get(ACCOUNT_KEY)? {
            Some(raw_account) => Some(serde_json::from_str::<Account>(&raw_account)?),
            None => None,
        };
        Ok(Some((user, account)))
    }

    fn persist(&self, response: &LoginResponse) -> Result<(), StorageError> {
        self.storage
            .set(ACCESS_TOKEN_KEY, response.tokens.access_token.expose_secret())?;
        self.storage
            .set(REFRESH_TOKEN_KEY, response.tokens.refresh_token.expose_secret())?;
        self.storage
            .set(USER_KEY, &serde_json::to_string(&response.user)?)?;
        self.storage
            .set(ACCOUNT_KEY, &serde_json::to_string(&response.account)?)?;
        Ok(())
    }

    /// Removes every session key, continuing past failures.
    fn clear_persisted(&self) -> Result<(), StorageError> {
        let mut first_error = None;
        for key in SESSION_KEYS {
            if let Err(e) = self.storage.remove(key) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
