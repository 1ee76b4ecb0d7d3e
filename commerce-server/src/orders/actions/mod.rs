//! One action per order operation
//!
//! Each action is a plain struct validated and executed against an
//! [`OpContext`] inside the manager's write transaction. Actions mutate the
//! order aggregate (and, for creation, stock and cart state) directly; the
//! manager persists the result and commits. An error return aborts the whole
//! transaction, so a failed action never leaves partial writes behind.

mod cancel_item;
mod cancel_return;
mod create_order;
mod process_refund;
mod refund_request;
mod request_return;
mod update_status;

pub use cancel_item::CancelItemAction;
pub use cancel_return::CancelReturnAction;
pub use create_order::{CreateOrderAction, CreateOrderRequest, OrderLineRequest};
pub use process_refund::ProcessRefundAction;
pub use refund_request::{RequestRefundAction, ReviewRefundAction};
pub use request_return::RequestReturnAction;
pub use update_status::UpdateItemStatusAction;

use super::storage::CommerceStore;
use chrono::{DateTime, Utc};
use redb::WriteTransaction;

/// Execution context for one operation
///
/// Borrows the open write transaction so every read an action performs sees
/// the operation's own writes, and every id it mints is checked against the
/// same snapshot it will commit into.
pub struct OpContext<'a> {
    pub txn: &'a WriteTransaction,
    pub store: &'a CommerceStore,
    pub max_id_attempts: u32,
    pub return_window_days: i64,
    pub now: DateTime<Utc>,
}
