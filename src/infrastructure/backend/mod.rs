pub mod gateway;
pub mod key_api;

pub use gateway::AuthenticatedRequestGateway;
pub use key_api::KeyApi;
