use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::subscription_status::SubscriptionStatus;

/// The tenant (clinic) the signed-in user belongs to. Persisted under the `account` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub plan: String,
    pub subscription_status: SubscriptionStatus,
    #[serde(default)]
    pub trial_ends_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Whole days left in the trial, or `None` when the account is not trialing.
    pub fn trial_days_left(&self, now: DateTime<Utc>) -> Option<i64> {
        if self.subscription_status != SubscriptionStatus::Trialing {
            return None;
        }
        self.trial_ends_at
            .map(|ends_at| (ends_at - now).num_days().max(0))
    }
}

/// Partial account record, shallow-merged like [`super::user::UserUpdate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_status: Option<SubscriptionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trial_ends_at: Option<Option<DateTime<Utc>>>,
}

impl AccountUpdate {
    pub fn apply_to(self, account: &mut Account) {
        if let Some(name) = self.name {
            account.name = name;
        }
        if let Some(plan) = self.plan {
            account.plan = plan;
        }
        if let Some(status) = self.subscription_status {
            account.subscription_status = status;
        }
        if let Some(trial_ends_at) = self.trial_ends_at {
            account.trial_ends_at = trial_ends_at;
        }
    }
}
