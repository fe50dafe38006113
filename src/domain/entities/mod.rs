pub mod account;
pub mod appointment_status;
pub mod pagination;
pub mod role;
pub mod subscription_status;
pub mod tokens;
pub mod user;

pub use account::{Account, AccountUpdate};
pub use appointment_status::AppointmentStatus;
pub use pagination::{Pagination, page_window};
pub use role::Role;
pub use subscription_status::SubscriptionStatus;
pub use tokens::{LoginResponse, Tokens};
pub use user::{User, UserUpdate};
