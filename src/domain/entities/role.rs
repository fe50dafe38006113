use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Coarse access level of a user inside their account.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Role {
    Owner,
    Admin,
    User,
    Viewer,
    /// Any role string the backend sends that this client does not know.
    /// Holds no privileges.
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Owners and admins bypass per-permission checks.
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Owner | Role::Admin)
    }
}
