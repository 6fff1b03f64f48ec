pub mod dispatcher;
pub mod error;
pub mod jsonrpc;
pub mod tools;

pub use dispatcher::{Dispatcher, ServerInfo, PROTOCOL_VERSION};
pub use error::{DispatchError, RegistryError, ToolError};
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use tools::{FnTool, Tool, ToolDefinition, ToolRegistry};
