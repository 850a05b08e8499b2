mod auth_services;
mod session_store;
mod settings_store;
mod tools;

pub use auth_services::*;
pub use session_store::*;
pub use settings_store::*;
pub use tools::*;
