//! Error types for vitrin-core
//!
//! Shared across the store, hub and feed modules; the API layer maps these
//! onto HTTP status codes.

use thiserror::Error;

/// Storefront error type
#[derive(Debug, Error)]
pub enum Error {
    /// Product not found
    #[error("product not found: {0}")]
    ProductNotFound(i64),

    /// Order not found
    #[error("order not found: {0}")]
    OrderNotFound(String),

    /// Invalid request payload
    #[error("validation error: {0}")]
    Validation(String),

    /// Unknown order status value
    #[error("unknown order status: {0}")]
    UnknownStatus(String),

    /// Database error
    #[error("database error: {0}")]
    Database(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a validation error
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a database error
    #[must_use]
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create an internal error
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error means "the caller asked for something that is not there"
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ProductNotFound(_) | Self::OrderNotFound(_))
    }

    /// Get error code for API responses
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ProductNotFound(_) => "product_not_found",
            Self::OrderNotFound(_) => "order_not_found",
            Self::Validation(_) => "validation_error",
            Self::UnknownStatus(_) => "unknown_status",
            Self::Database(_) => "database_error",
            Self::Serialization(_) => "serialization_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::Database("row not found".to_string()),
            other => Self::Database(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for storefront operations
pub type Result<T> = std::result::Result<T, Error>;
