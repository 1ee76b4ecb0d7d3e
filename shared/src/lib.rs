//! Shared types for the commerce backend
//!
//! Common types used across crates: the unified error system, the order
//! domain model (statuses, aggregates, payment enums), and small utilities
//! (timestamps, ID generation).

pub mod error;
pub mod order;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use order::{ItemStatus, Order, OrderItem};
pub use serde::{Deserialize, Serialize};
