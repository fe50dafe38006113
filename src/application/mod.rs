pub mod app_error;
pub mod formatters;
pub mod forms;
pub mod ports;
pub mod query_cache;
pub mod route_guard;
pub mod routes;
pub mod use_cases;
pub mod validators;
