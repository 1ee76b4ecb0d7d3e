use super::super::storage::StorageError;
use chrono::{DateTime, Utc};
use shared::error::{AppError, ErrorCode};
use shared::order::ItemStatus;
use thiserror::Error;

/// Action-level errors raised while validating and mutating an order
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Return request not found: {0}")]
    ReturnNotFound(String),

    #[error("Illegal transition from {from} to {to}")]
    InvalidTransition { from: ItemStatus, to: ItemStatus },

    #[error("Invalid quantity: requested {requested}, batch holds {available}")]
    InvalidQuantity { requested: u32, available: u32 },

    #[error("Return window of {window_days} days expired (delivered {delivered_at})")]
    ReturnWindowExpired {
        delivered_at: DateTime<Utc>,
        window_days: i64,
    },

    #[error("{message}")]
    Code { code: ErrorCode, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl OrderError {
    /// Shorthand for a coded error with a formatted message
    pub fn coded(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Code {
            code,
            message: message.into(),
        }
    }
}

/// Manager errors
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type ManagerResult<T> = Result<T, ManagerError>;

/// Map infrastructure failures to the retryable/system error codes
fn classify_storage_error(e: &StorageError) -> ErrorCode {
    match e {
        StorageError::Serialization(_) => return ErrorCode::InternalError,
        StorageError::OrderNotFound(_) => return ErrorCode::OrderNotFound,
        StorageError::Commit(_) => return ErrorCode::TransactionAborted,
        _ => {}
    }

    let err_str = e.to_string().to_lowercase();
    if err_str.contains("corrupt") || err_str.contains("invalid database") {
        return ErrorCode::DatabaseError;
    }

    // Database/Transaction/Table/Storage errors default to retryable busy
    ErrorCode::SystemBusy
}

impl ManagerError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Order(err) => match err {
                OrderError::OrderNotFound(_) => ErrorCode::OrderNotFound,
                OrderError::ItemNotFound(_) => ErrorCode::ItemNotFound,
                OrderError::ReturnNotFound(_) => ErrorCode::ReturnNotFound,
                OrderError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
                OrderError::InvalidQuantity { .. } => ErrorCode::InvalidQuantity,
                OrderError::ReturnWindowExpired { .. } => ErrorCode::ReturnWindowExpired,
                OrderError::Code { code, .. } => *code,
                OrderError::Storage(e) => classify_storage_error(e),
            },
            Self::Storage(e) => classify_storage_error(e),
        }
    }
}

impl From<ManagerError> for AppError {
    fn from(err: ManagerError) -> Self {
        let code = err.code();
        let message = err.to_string();
        if matches!(code.category(), shared::error::ErrorCategory::System) {
            tracing::error!(error = %message, error_code = ?code, "Operation failed with system error");
        }
        AppError::with_message(code, message)
    }
}
