use serde::Deserialize;
use thiserror::Error;

/// Shown when a failed response carries neither a `message` nor `errors`.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// One entry of a failure envelope's `errors` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Option<String>,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status}: {}", .message.as_deref().unwrap_or(GENERIC_ERROR_MESSAGE))]
    Http {
        status: u16,
        message: Option<String>,
        errors: Vec<FieldError>,
    },

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Builds an HTTP error from a raw failure body (`{ message?, errors? }`).
    /// Bodies that are not JSON, or not in the expected shape, yield no message.
    pub fn from_response_body(status: u16, body: &[u8]) -> Self {
        let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
        ApiError::Http {
            status,
            message: parsed.message.filter(|m| !m.trim().is_empty()),
            errors: parsed.errors.into_iter().map(FieldError::from).collect(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The stored token was rejected by the backend.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Failures worth retrying for reads: transport errors and 5xx responses.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(e) => !e.is_decode() && !e.is_builder(),
            ApiError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Message suitable for an inline, dismissible alert.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Http { errors, .. } if !errors.is_empty() => errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorItem>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorItem {
    Text(String),
    Field {
        #[serde(default, alias = "path", alias = "param")]
        field: Option<String>,
        #[serde(alias = "msg")]
        message: String,
    },
}

impl From<ErrorItem> for FieldError {
    fn from(item: ErrorItem) -> Self {
        match item {
            ErrorItem::Text(message) => FieldError {
                field: None,
                message,
            },
            ErrorItem::Field { field, message } => FieldError { field, message },
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("No authenticated session")]
    NotAuthenticated,
}

impl SessionError {
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Api(e) => e.user_message(),
            SessionError::Storage(_) => GENERIC_ERROR_MESSAGE.to_string(),
            SessionError::NotAuthenticated => "Please sign in to continue.".to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
