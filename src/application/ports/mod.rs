pub mod key_value_store;
pub mod session_gateway;

pub use key_value_store::KeyValueStore;
pub use session_gateway::SessionGateway;
