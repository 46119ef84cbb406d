//! # App Error Type
//!
//! Unified error type for storefront commands. This is what the user sees
//! when an action fails: one line with a machine-readable code and a
//! human-readable message.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  storefront cart update 12 --quantity 9                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  AppResult<()>                                                   │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Stock check? ──── CoreError::InsufficientStock ──┐              │  │
//! │  │         │                                         │              │  │
//! │  │         ▼                                         ▼              │  │
//! │  │  Backend call? ─── ClientError::Http { .. } ──── AppError ──────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Local store? ──── DbError::QueryFailed ─────────┘               │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr: [INSUFFICIENT_STOCK] Only 3 left in stock for Linen shirt ...  │
//! │  prior state (cart, lists) is left as it was                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use storefront_client::ClientError;
use storefront_core::{CoreError, ValidationError};
use storefront_db::DbError;

/// Error returned from storefront commands.
///
/// ## Serialization
/// With `--json` the error is printed as:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: 42"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("[{}] {message}", .code.as_str())]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed, locally or by the backend (400)
    ValidationError,

    /// Sign-in required or not permitted (401/403)
    Unauthorized,

    /// Backend unreachable or timed out
    NetworkError,

    /// Backend answered with an error
    ServerError,

    /// Local store operation failed
    StorageError,

    /// Configuration is invalid or could not be read/written
    ConfigError,

    /// Cart operation failed
    CartError,

    /// Requested quantity is not in stock
    InsufficientStock,

    /// A list rule refused the change (e.g. comparison full)
    BusinessLogic,

    /// Anything else
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::ServerError => "SERVER_ERROR",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::CartError => "CART_ERROR",
            ErrorCode::InsufficientStock => "INSUFFICIENT_STOCK",
            ErrorCode::BusinessLogic => "BUSINESS_LOGIC",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl AppError {
    /// Creates a new app error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        AppError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }

    /// Creates a cart error.
    pub fn cart(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::CartError, message)
    }
}

/// Result type for commands and state operations.
pub type AppResult<T> = Result<T, AppError>;

/// Converts local store errors to app errors.
impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Rejected(core) => AppError::from(core),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Local store connection failed: {}", e);
                AppError::new(ErrorCode::StorageError, "Local storage is unavailable")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Local store migration failed: {}", e);
                AppError::new(ErrorCode::StorageError, "Local storage migration failed")
            }
            DbError::QueryFailed(e) | DbError::Internal(e) => {
                tracing::error!("Local store operation failed: {}", e);
                AppError::new(ErrorCode::StorageError, "Local storage operation failed")
            }
            DbError::Serialization { key, message } => {
                tracing::error!(%key, "Could not encode stored value: {}", message);
                AppError::new(ErrorCode::StorageError, format!("Could not save '{}'", key))
            }
            DbError::PoolExhausted => {
                AppError::new(ErrorCode::StorageError, "Local storage is busy")
            }
        }
    }
}

/// Converts core errors to app errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InsufficientStock { .. } | CoreError::OutOfStock { .. } => {
                AppError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            CoreError::QuantityTooSmall { .. } => AppError::validation(err.to_string()),
            CoreError::ComparisonFull { .. } => {
                AppError::new(ErrorCode::BusinessLogic, err.to_string())
            }
            CoreError::CartItemNotFound(id) => AppError::not_found("Cart item", id),
            CoreError::Validation(e) => AppError::from(e),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

/// Converts backend client errors to app errors.
///
/// ## Error Mapping
/// ```text
/// Validation            → VALIDATION_ERROR (never sent)
/// NotFound (404)        → NOT_FOUND
/// Unauthorized (401/403)→ UNAUTHORIZED
/// Http 4xx              → VALIDATION_ERROR (backend message kept)
/// Http 5xx              → SERVER_ERROR
/// Connection / Timeout  → NETWORK_ERROR
/// Config*               → CONFIG_ERROR
/// ```
impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Validation(e) => AppError::from(e),
            ClientError::NotFound(message) => AppError::new(ErrorCode::NotFound, message),
            ClientError::Unauthorized(message) => AppError::new(ErrorCode::Unauthorized, message),
            ClientError::Http { status, message } if (400..500).contains(&status) => {
                AppError::validation(message)
            }
            ClientError::Http { status, message } => {
                tracing::warn!(status, "Backend error: {}", message);
                AppError::new(ErrorCode::ServerError, message)
            }
            ClientError::ConnectionFailed(_) | ClientError::Timeout => {
                AppError::new(ErrorCode::NetworkError, err.to_string())
            }
            ClientError::InvalidConfig(_)
            | ClientError::InvalidUrl(_)
            | ClientError::ConfigLoadFailed(_)
            | ClientError::ConfigSaveFailed(_) => {
                AppError::new(ErrorCode::ConfigError, err.to_string())
            }
            ClientError::Request(_) | ClientError::Decode(_) | ClientError::ChannelClosed(_) => {
                tracing::error!("Client failure: {}", err);
                AppError::internal(err.to_string())
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
