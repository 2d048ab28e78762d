use std::error::Error;
use std::fmt;

/// Represents errors that can occur in node RPC operations
#[derive(Debug, Clone)]
pub enum RpcError {
    /// The node could not be reached or the request timed out
    Transport(String),
    /// The node rejected the credentials
    Auth(String),
    /// Non-success HTTP status without a JSON-RPC error body
    Http(u16),
    /// JSON-RPC error object returned by the node
    Rpc { code: i64, message: String },
    /// Response could not be decoded
    Parse(String),
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcError::Transport(msg) => write!(f, "Transport error: {}", msg),
            RpcError::Auth(msg) => write!(f, "Authentication error: {}", msg),
            RpcError::Http(status) => write!(f, "HTTP error status: {}", status),
            RpcError::Rpc { code, message } => write!(f, "RPC error {}: {}", code, message),
            RpcError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl Error for RpcError {}

impl From<reqwest::Error> for RpcError {
    fn from(error: reqwest::Error) -> Self {
        RpcError::Transport(error.to_string())
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(error: serde_json::Error) -> Self {
        RpcError::Parse(error.to_string())
    }
}
