//! # Client Error Types
//!
//! Error types for backend calls and client configuration.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Response            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Connection     │  │  NotFound (404)         │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  Unauthorized (401/403) │ │
//! │  │  ConfigLoad/Save│  │  Request        │  │  Http { status, .. }    │ │
//! │  └─────────────────┘  └─────────────────┘  │  Decode                 │ │
//! │                                            └─────────────────────────┘ │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │   Validation    │  │    Internal     │                              │
//! │  │                 │  │                 │                              │
//! │  │  rejected before│  │  ChannelClosed  │                              │
//! │  │  any request    │  │                 │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use storefront_core::ValidationError;
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error type covering configuration, transport and response
/// failures.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid backend URL.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Backend unreachable.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request did not complete in time.
    #[error("Request timed out")]
    Timeout,

    /// Any other failure while sending the request.
    #[error("Request failed: {0}")]
    Request(String),

    // =========================================================================
    // Response Errors
    // =========================================================================
    /// 404 from the backend.
    #[error("Not found: {0}")]
    NotFound(String),

    /// 401 or 403 from the backend.
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    /// Any other non-success status.
    #[error("Server returned {status}: {message}")]
    Http { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    /// Input rejected before any request was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Background task is gone.
    #[error("Channel error: {0}")]
    ChannelClosed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_connect() {
            ClientError::ConnectionFailed(err.to_string())
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Request(err.to_string())
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Builds the error for a non-success status.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            404 => ClientError::NotFound(message),
            401 | 403 => ClientError::Unauthorized(message),
            _ => ClientError::Http { status, message },
        }
    }

    /// HTTP status the backend answered with, if it answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::NotFound(_) => Some(404),
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the backend rejected the request itself (4xx).
    pub fn is_client_error(&self) -> bool {
        match self {
            ClientError::NotFound(_) | ClientError::Unauthorized(_) => true,
            ClientError::Http { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }

    /// Returns true if the backend failed (5xx) or could not be reached.
    pub fn is_server_error(&self) -> bool {
        match self {
            ClientError::Http { status, .. } => *status >= 500,
            ClientError::ConnectionFailed(_) | ClientError::Timeout => true,
            _ => false,
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }
}
