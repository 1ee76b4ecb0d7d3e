//! Unified error codes for the commerce backend
//!
//! Error codes are shared between the server core and its callers so that
//! failure kinds stay machine-checkable across the boundary. Codes are
//! organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Product errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed (malformed or missing input)
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order item not found
    ItemNotFound = 4002,
    /// Status transition is not allowed by the transition table
    InvalidTransition = 4003,
    /// Requested quantity exceeds the batch quantity
    InvalidQuantity = 4004,
    /// Return window has expired
    ReturnWindowExpired = 4005,
    /// Requested line does not match the user's cart
    CartMismatch = 4006,
    /// Identifier generation exhausted its collision retries (transient)
    DuplicateIdentifier = 4007,
    /// Return record not found
    ReturnNotFound = 4008,
    /// Refund has already been processed for this item
    RefundAlreadyProcessed = 4009,
    /// Refund has already been requested for this item
    RefundAlreadyRequested = 4010,

    // ==================== 5xxx: Payment ====================
    /// Selected payment method is currently disabled
    PaymentMethodDisabled = 5001,
    /// Item is not eligible for a refund
    RefundNotEligible = 5002,

    // ==================== 6xxx: Product ====================
    /// Product not found or inactive
    ProductNotFound = 6001,
    /// Color not found or inactive
    ColorNotFound = 6002,
    /// No variant for the requested color/size
    VariantNotFound = 6003,
    /// Stock counter would go negative
    InsufficientStock = 6004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Atomic scope rolled back due to an infrastructure failure
    TransactionAborted = 9003,
    /// System busy, retry later
    SystemBusy = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default human-readable message for this code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",

            Self::OrderNotFound => "Order not found",
            Self::ItemNotFound => "Order item not found",
            Self::InvalidTransition => "Status transition not allowed",
            Self::InvalidQuantity => "Quantity exceeds batch quantity",
            Self::ReturnWindowExpired => "Return window expired",
            Self::CartMismatch => "Item not found in cart",
            Self::DuplicateIdentifier => "Identifier generation exhausted retries",
            Self::ReturnNotFound => "Return record not found",
            Self::RefundAlreadyProcessed => "Refund already processed",
            Self::RefundAlreadyRequested => "Refund already requested",

            Self::PaymentMethodDisabled => "Payment method disabled",
            Self::RefundNotEligible => "Item not eligible for refund",

            Self::ProductNotFound => "Product not found",
            Self::ColorNotFound => "Color not found",
            Self::VariantNotFound => "Variant not found",
            Self::InsufficientStock => "Insufficient stock",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::TransactionAborted => "Transaction aborted",
            Self::SystemBusy => "System busy, please retry",
        }
    }

    /// Get the HTTP status code for this error (boundary contract only,
    /// the HTTP layer itself lives outside this workspace)
    pub fn http_status(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Self::Success => StatusCode::OK,
            Self::Unknown | Self::InternalError | Self::DatabaseError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::ValidationFailed | Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::NotFound
            | Self::OrderNotFound
            | Self::ItemNotFound
            | Self::ReturnNotFound
            | Self::ProductNotFound
            | Self::ColorNotFound
            | Self::VariantNotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists
            | Self::RefundAlreadyProcessed
            | Self::RefundAlreadyRequested => StatusCode::CONFLICT,
            Self::InvalidTransition
            | Self::InvalidQuantity
            | Self::ReturnWindowExpired
            | Self::CartMismatch
            | Self::PaymentMethodDisabled
            | Self::RefundNotEligible
            | Self::InsufficientStock => StatusCode::UNPROCESSABLE_ENTITY,
            Self::DuplicateIdentifier | Self::TransactionAborted | Self::SystemBusy => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }

    /// Whether a caller may retry the same request unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::DuplicateIdentifier | Self::TransactionAborted | Self::SystemBusy
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            4001 => Self::OrderNotFound,
            4002 => Self::ItemNotFound,
            4003 => Self::InvalidTransition,
            4004 => Self::InvalidQuantity,
            4005 => Self::ReturnWindowExpired,
            4006 => Self::CartMismatch,
            4007 => Self::DuplicateIdentifier,
            4008 => Self::ReturnNotFound,
            4009 => Self::RefundAlreadyProcessed,
            4010 => Self::RefundAlreadyRequested,
            5001 => Self::PaymentMethodDisabled,
            5002 => Self::RefundNotEligible,
            6001 => Self::ProductNotFound,
            6002 => Self::ColorNotFound,
            6003 => Self::VariantNotFound,
            6004 => Self::InsufficientStock,
            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            9003 => Self::TransactionAborted,
            9004 => Self::SystemBusy,
            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_u16() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::InvalidTransition,
            ErrorCode::InsufficientStock,
            ErrorCode::TransactionAborted,
        ] {
            let raw: u16 = code.into();
            assert_eq!(ErrorCode::try_from(raw).unwrap(), code);
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
    }

    #[test]
    fn test_retryable_codes() {
        assert!(ErrorCode::DuplicateIdentifier.is_retryable());
        assert!(ErrorCode::TransactionAborted.is_retryable());
        assert!(!ErrorCode::InvalidTransition.is_retryable());
    }

    #[test]
    fn test_http_status_distinguishes_kinds() {
        assert_ne!(
            ErrorCode::InvalidTransition.http_status(),
            ErrorCode::OrderNotFound.http_status()
        );
    }
}
