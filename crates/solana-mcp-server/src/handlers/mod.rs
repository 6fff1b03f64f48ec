mod fallback;
mod health;
mod info;
mod mcp;

pub use fallback::{fallback, method_not_allowed};
pub use health::health;
pub use info::server_info;
pub use mcp::mcp_request;
