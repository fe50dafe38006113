use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Billing state of an account's plan, as reported by the backend.
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
pub enum SubscriptionStatus {
    Trialing,
    Active,
    PastDue,
    Canceled,
    Unpaid,
    #[serde(other)]
    Unknown,
}

impl SubscriptionStatus {
    /// Returns true if the subscription grants access to the application (active or trialing).
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active | Self::Trialing)
    }

    /// Human-readable label for banners and account summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Trialing => "Trial",
            Self::Active => "Active",
            Self::PastDue => "Payment overdue",
            Self::Canceled => "Canceled",
            Self::Unpaid => "Unpaid",
            Self::Unknown => "Unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case_serialization() {
        let json = serde_json::to_string(&SubscriptionStatus::PastDue).unwrap();
        assert_eq!(json, r#""past_due""#);

        let parsed: SubscriptionStatus = serde_json::from_str(r#""trialing""#).unwrap();
        assert_eq!(parsed, SubscriptionStatus::Trialing);
    }

    #[test]
    fn test_is_active() {
        assert!(SubscriptionStatus::Active.is_active());
        assert!(SubscriptionStatus::Trialing.is_active());
        assert!(!SubscriptionStatus::PastDue.is_active());
        assert!(!SubscriptionStatus::Canceled.is_active());
        assert!(!SubscriptionStatus::Unpaid.is_active());
        assert!(!SubscriptionStatus::Unknown.is_active());
    }

    #[test]
    fn test_unrecognized_status_is_not_active() {
        let parsed: SubscriptionStatus = serde_json::from_str(r#""incomplete""#).unwrap();
        assert_eq!(parsed, SubscriptionStatus::Unknown);
        assert!(!parsed.is_active());
    }
}
