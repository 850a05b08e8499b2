mod auth_state;
mod event;
mod gateway_error;
mod pending_call;
mod request_config;
mod session;
mod storage;
mod tool;

pub use auth_state::*;
pub use event::*;
pub use gateway_error::*;
pub use pending_call::*;
pub use request_config::*;
pub use session::*;
pub use storage::*;
pub use tool::*;
