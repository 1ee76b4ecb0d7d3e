//! Order domain model
//!
//! This module provides the types for the order lifecycle:
//! - Statuses: the item state machine and its static transition table
//! - Aggregates: orders owning sequences of order-item batches
//! - Payment enums shared with the payment collaborator

pub mod status;
pub mod types;

// Re-exports
pub use status::{ItemStatus, overall_status};
pub use types::{
    Amount, ColorRef, ImageRef, MONEY_DECIMAL_PLACES, Order, OrderItem, PaymentMethod,
    PaymentProvider, PaymentStatus, ProductRef, RefundAccountDetails, RefundAccountType,
    ShippingInfo, Size, StatusHistoryEntry,
};
