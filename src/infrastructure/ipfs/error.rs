use std::error::Error;
use std::fmt;

/// Error type for IPFS gateway fetches
#[derive(Debug)]
pub enum IpfsError {
    /// Error from the reqwest HTTP client, including timeouts
    HttpError(reqwest::Error),
    /// Gateway answered with a non-success status
    StatusError(u16),
    /// Body was not a JSON object
    InvalidContent(String),
    /// Every configured gateway failed
    Exhausted(String),
}

impl fmt::Display for IpfsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpfsError::HttpError(e) => write!(f, "HTTP error: {}", e),
            IpfsError::StatusError(code) => write!(f, "Gateway returned status {}", code),
            IpfsError::InvalidContent(msg) => write!(f, "Invalid content: {}", msg),
            IpfsError::Exhausted(hash) => write!(f, "All gateways failed for {}", hash),
        }
    }
}

impl Error for IpfsError {}

impl From<reqwest::Error> for IpfsError {
    fn from(error: reqwest::Error) -> Self {
        IpfsError::HttpError(error)
    }
}
