use crate::jsonrpc::INTERNAL_ERROR;

/// Failure raised by a tool's own logic.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("missing required argument '{0}'")]
    MissingArgument(String),

    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("{0}")]
    Execution(String),

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<ToolError>,
    },
}

impl ToolError {
    /// Prefix the error with a description of the operation that failed.
    #[must_use]
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Failure while routing or executing a JSON-RPC request.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Method '{0}' not supported")]
    MethodNotSupported(String),

    #[error("Tool '{0}' not found")]
    ToolNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Failed to serialize tool result: {0}")]
    Serialization(String),

    #[error(transparent)]
    Tool(#[from] ToolError),
}

impl DispatchError {
    /// JSON-RPC error code reported for this failure.
    ///
    /// Every dispatch-level failure shares the generic internal error code;
    /// clients distinguish them by message.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn code(&self) -> i32 {
        INTERNAL_ERROR
    }
}

/// Failure while registering a tool.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("tool name must not be empty")]
    EmptyName,
}
