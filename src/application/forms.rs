//! Form schemas checked before anything is submitted to the API.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::app_error::ApiError;
use crate::application::validators::{
    validate_document, validate_not_blank, validate_not_future, validate_phone,
};

/// Field name to the messages shown under it. Non-empty means the form cannot be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Field errors the backend reported for a rejected submission.
    /// Entries without a field are filed under `_form`.
    pub fn from_api(error: &ApiError) -> Self {
        let mut out = Self::default();
        if let ApiError::Http { errors, .. } = error {
            for e in errors {
                let field = e.field.as_deref().map(snake_case).unwrap_or_else(|| "_form".into());
                out.add(field, e.message.clone());
            }
        }
        out
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                first = false;
                write!(f, "{field}: {message}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = Self::default();
        for (field, list) in errors.field_errors() {
            for e in list {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", e.code));
                out.add(field.to_string(), message);
            }
        }
        out
    }
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

pub fn validate_form<T: Validate>(form: &T) -> Result<(), FormErrors> {
    form.validate().map_err(FormErrors::from)
}

// ============================================================================
// Auth forms
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    #[validate(email(message = "Enter a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    #[validate(length(min = 2, max = 120, message = "Enter the practice name"))]
    pub account_name: String,
    #[validate(length(min = 2, message = "Enter your first name"))]
    pub first_name: String,
    #[validate(length(min = 2, message = "Enter your last name"))]
    pub last_name: String,
    #[validate(email(message = "Enter a valid email"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirmation: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ForgotPasswordForm {
    #[validate(email(message = "Enter a valid email"))]
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordForm {
    #[validate(length(min = 1, message = "Reset link is invalid"))]
    pub token: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirmation: String,
}

// ============================================================================
// Record forms
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
#[serde(rename_all = "camelCase")]
pub struct ClientForm {
    #[validate(length(min = 2, max = 160, message = "Enter the client's name"))]
    pub name: String,
    #[validate(email(message = "Enter a valid email"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(custom(function = "validate_document"))]
    pub document: Option<String>,
    pub address: Option<String>,
    #[validate(length(max = 1000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
#[serde(rename_all = "camelCase")]
pub struct AnimalForm {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub species: String,
    pub breed: Option<String>,
    pub sex: Option<String>,
    #[validate(custom(function = "validate_not_future"))]
    pub birth_date: Option<NaiveDate>,
    #[validate(range(exclusive_min = 0.0, message = "Weight must be greater than zero"))]
    pub weight: Option<f64>,
    #[validate(custom(function = "validate_not_blank"))]
    pub client_id: String,
    pub batch_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentForm {
    #[validate(custom(function = "validate_not_blank"))]
    pub client_id: String,
    pub animal_id: Option<String>,
    pub service_id: Option<String>,
    #[validate(required(message = "Pick a date and time"))]
    pub scheduled_at: Option<NaiveDateTime>,
    #[validate(length(max = 1000, message = "Notes are too long"))]
    pub notes: Option<String>,
}
