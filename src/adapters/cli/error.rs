use thiserror::Error;

use crate::app_error::{ApiError, SessionError, StorageError};
use crate::application::forms::FormErrors;
use crate::domain::entities::AppointmentStatus;

/// Failures a command reports to the user. Display is the text shown in the terminal.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{}", .0.user_message())]
    Session(#[from] SessionError),

    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),

    #[error("Please fix the following: {0}")]
    Form(#[from] FormErrors),

    #[error("You cannot open {path} (redirected to {to})")]
    Denied { path: String, to: String },

    #[error("Your session has expired. Please sign in again.")]
    SessionExpired,

    #[error("--data is not valid JSON: {0}")]
    InvalidData(#[source] serde_json::Error),

    #[error("An appointment that is {} cannot be moved to {}", .from.label(), .to.label())]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Nothing to update")]
    EmptyUpdate,

    #[error("Session storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Could not write output: {0}")]
    Output(#[from] std::io::Error),
}

pub type CliResult<T> = Result<T, CliError>;
