//! Terminal front end.
//!
//! Each command resolves the page it corresponds to, runs the route guard for
//! the current session, and only then talks to the API.

pub mod app_state;
pub mod commands;
pub mod error;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::application::routes::Route;
use crate::domain::entities::AppointmentStatus;

pub use commands::run;
pub use error::{CliError, CliResult};
pub use output::OutputFormat;

/// vetdesk - veterinary practice management from the terminal
#[derive(Parser, Debug)]
#[command(name = "vetdesk", version, about, author)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Backend base URL (overrides API_BASE_URL)
    #[arg(long, global = true)]
    pub api_url: Option<url::Url>,

    /// Session file (overrides SESSION_FILE)
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "VETDESK_PASSWORD", hide_env_values = true)]
        password: String,
        /// Page to return to after signing in
        #[arg(long)]
        from: Option<String>,
    },
    /// Sign out and clear the stored session
    Logout,
    /// Show the signed-in user and account
    Whoami,
    /// Show what opening a page would do for the current session
    Open { path: String },
    /// List records, with optional `key=value` filters
    List {
        resource: ResourceKind,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        /// Extra query parameters as key=value
        #[arg(long = "filter")]
        filters: Vec<String>,
    },
    /// Show one record
    Show { resource: ResourceKind, id: String },
    /// Create a record from a JSON body
    Create {
        resource: ResourceKind,
        #[arg(short, long)]
        data: String,
    },
    /// Replace fields of a record from a JSON body
    Update {
        resource: ResourceKind,
        id: String,
        #[arg(short, long)]
        data: String,
    },
    /// Delete a record
    Delete { resource: ResourceKind, id: String },
    /// Move an appointment to a new status
    AppointmentStatus {
        id: String,
        status: AppointmentStatus,
    },
    /// Update your own name or email
    Profile {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    Clients,
    Animals,
    Batches,
    Appointments,
    Services,
    Reproductive,
    Sanitary,
    Transactions,
    Invoices,
    Users,
}

impl ResourceKind {
    /// Cache key root; also the collection name.
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Clients => "clients",
            ResourceKind::Animals => "animals",
            ResourceKind::Batches => "batches",
            ResourceKind::Appointments => "appointments",
            ResourceKind::Services => "services",
            ResourceKind::Reproductive => "reproductive",
            ResourceKind::Sanitary => "sanitary",
            ResourceKind::Transactions => "transactions",
            ResourceKind::Invoices => "invoices",
            ResourceKind::Users => "users",
        }
    }

    /// The page this resource is managed from.
    pub fn route(&self) -> Route {
        match self {
            ResourceKind::Transactions => Route::Financial,
            ResourceKind::Clients => Route::Clients,
            ResourceKind::Animals => Route::Animals,
            ResourceKind::Batches => Route::Batches,
            ResourceKind::Appointments => Route::Appointments,
            ResourceKind::Services => Route::Services,
            ResourceKind::Reproductive => Route::Reproductive,
            ResourceKind::Sanitary => Route::Sanitary,
            ResourceKind::Invoices => Route::Invoices,
            ResourceKind::Users => Route::Users,
        }
    }

    /// The detail page of one record, where the route table has one.
    /// Built from the id directly; ids are never re-parsed as paths.
    pub fn detail_route(&self, id: &str) -> Route {
        let id = id.to_string();
        match self {
            ResourceKind::Clients => Route::ClientDetail(id),
            ResourceKind::Animals => Route::AnimalDetail(id),
            ResourceKind::Batches => Route::BatchDetail(id),
            ResourceKind::Invoices => Route::InvoiceDetail(id),
            _ => self.route(),
        }
    }
}
