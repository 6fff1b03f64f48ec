use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A JSON-RPC 2.0 request.
///
/// Only `method` drives routing. A missing `id` stays absent (an explicit
/// `null` is kept as `Some(Value::Null)`) and a missing `method` is the empty
/// string, so any JSON object is a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default = "version")]
    pub jsonrpc: String,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Value>,
    #[serde(default)]
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Build a request with the given id, method and params.
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: version(),
            id: Some(id.into()),
            method: method.into(),
            params,
        }
    }

    /// Read a request out of any parsed JSON body.
    ///
    /// Objects contribute their `id`, `params` and `method`; a `method` that
    /// is not a string is routed by its JSON text (`5`, `true`, ...). Arrays
    /// and scalars carry no fields and route as the empty method. Only a
    /// `null` body yields `None`.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        let mut fields = match value {
            Value::Null => return None,
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };

        let method = match fields.remove("method") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(method)) => method,
            Some(other) => other.to_string(),
        };
        let jsonrpc = match fields.remove("jsonrpc") {
            Some(Value::String(v)) => v,
            _ => version(),
        };

        Some(Self {
            jsonrpc,
            id: fields.remove("id"),
            method,
            params: fields.remove("params").filter(|p| !p.is_null()),
        })
    }
}

/// A JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    /// Absent on parse failures and when the request carried no id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: version(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: version(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// The response for a body that could not be parsed into a request.
    pub fn parse_error() -> Self {
        Self {
            jsonrpc: version(),
            id: None,
            result: None,
            error: Some(JsonRpcError {
                code: PARSE_ERROR,
                message: "Parse error".to_string(),
                data: None,
            }),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Standard JSON-RPC error codes.
pub const PARSE_ERROR: i32 = -32700;
pub const INTERNAL_ERROR: i32 = -32603;

fn version() -> String {
    "2.0".to_string()
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
