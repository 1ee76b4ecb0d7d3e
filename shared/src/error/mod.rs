//! Unified error system for the commerce backend
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all failure kinds
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified response format at the boundary
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Product errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! // Create a simple error
//! let err = AppError::new(ErrorCode::InsufficientStock);
//!
//! // Create an error with custom message and details
//! let err = AppError::with_message(ErrorCode::InvalidQuantity, "Cancel quantity exceeds batch")
//!     .with_detail("requested", 5)
//!     .with_detail("available", 3);
//!
//! // Convert to API response
//! let response = ApiResponse::<()>::error(&err);
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
