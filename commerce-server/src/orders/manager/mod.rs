//! OrdersManager - operation execution and queries
//!
//! Every mutating operation runs the same way:
//!
//! ```text
//! operation(args)
//!     ├─ 1. Begin write transaction
//!     ├─ 2. Build OpContext (store, config knobs, timestamp)
//!     ├─ 3. Execute the action (validate, mutate, persist)
//!     ├─ 4. Commit on success; drop (abort) on any error
//!     └─ 5. Return the updated order
//! ```
//!
//! redb serializes writers, so operations on the same store never interleave
//! and a dropped transaction leaves no partial writes behind.

mod error;
pub use error::*;

use super::actions::{
    CancelItemAction, CancelReturnAction, CreateOrderAction, CreateOrderRequest, OpContext,
    ProcessRefundAction, RequestRefundAction, RequestReturnAction, ReviewRefundAction,
    UpdateItemStatusAction,
};
use super::storage::{CommerceStore, StorageError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::order::{ItemStatus, Order, PaymentStatus, RefundAccountDetails};
use std::collections::HashMap;
use std::path::Path;

/// One order in a user's order listing
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub order_id: String,
    pub overall_status: ItemStatus,
    pub total_amount: Decimal,
    pub total_quantity: u32,
    pub item_count: usize,
    pub payment_status: PaymentStatus,
    pub ordered_at: DateTime<Utc>,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.order_id.clone(),
            overall_status: order.overall_status(),
            total_amount: order.total_amount(),
            total_quantity: order.total_quantity(),
            item_count: order.items.len(),
            payment_status: order.payment_status,
            ordered_at: order.ordered_at,
        }
    }
}

/// One order in the admin listing, with per-status quantity counts
#[derive(Debug, Clone, Serialize)]
pub struct AdminOrderSummary {
    pub order_id: String,
    pub user_id: String,
    pub overall_status: ItemStatus,
    pub total_amount: Decimal,
    pub total_quantity: u32,
    /// Units per status across all batches of the order
    pub status_quantities: HashMap<ItemStatus, u32>,
    pub payment_status: PaymentStatus,
    pub ordered_at: DateTime<Utc>,
}

impl From<&Order> for AdminOrderSummary {
    fn from(order: &Order) -> Self {
        let mut status_quantities: HashMap<ItemStatus, u32> = HashMap::new();
        for item in &order.items {
            *status_quantities.entry(item.order_status).or_default() += item.quantity;
        }
        Self {
            order_id: order.order_id.clone(),
            user_id: order.user_id.clone(),
            overall_status: order.overall_status(),
            total_amount: order.total_amount(),
            total_quantity: order.total_quantity(),
            status_quantities,
            payment_status: order.payment_status,
            ordered_at: order.ordered_at,
        }
    }
}

/// One open or settled return request in the admin listing
#[derive(Debug, Clone, Serialize)]
pub struct ReturnRequestView {
    pub return_id: String,
    pub order_id: String,
    pub user_id: String,
    pub item_id: String,
    pub status: ItemStatus,
    pub quantity: u32,
    pub requested_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

/// OrdersManager executes operations against the store
#[derive(Debug, Clone)]
pub struct OrdersManager {
    store: CommerceStore,
    max_id_attempts: u32,
    return_window_days: i64,
}

impl OrdersManager {
    /// Open the store at the given path
    pub fn new(
        db_path: impl AsRef<Path>,
        return_window_days: i64,
        max_id_attempts: u32,
    ) -> ManagerResult<Self> {
        let store = CommerceStore::open(db_path)?;
        tracing::info!(return_window_days, "OrdersManager started");
        Ok(Self {
            store,
            max_id_attempts,
            return_window_days,
        })
    }

    /// Wrap an existing store (for testing)
    #[cfg(test)]
    pub fn with_store(store: CommerceStore) -> Self {
        Self {
            store,
            max_id_attempts: 16,
            return_window_days: 7,
        }
    }

    /// Get the underlying store
    pub fn store(&self) -> &CommerceStore {
        &self.store
    }

    /// Run an action inside one write transaction, committing on success
    fn run<T>(
        &self,
        now: DateTime<Utc>,
        f: impl FnOnce(&OpContext<'_>) -> Result<T, OrderError>,
    ) -> ManagerResult<T> {
        let txn = self.store.begin_write()?;
        let ctx = OpContext {
            txn: &txn,
            store: &self.store,
            max_id_attempts: self.max_id_attempts,
            return_window_days: self.return_window_days,
            now,
        };
        let result = f(&ctx)?;
        txn.commit().map_err(StorageError::from)?;
        Ok(result)
    }

    // ========== Operations ==========

    /// Create an order from cart-validated lines
    pub fn create_order(&self, request: CreateOrderRequest) -> ManagerResult<Order> {
        self.run(Utc::now(), |ctx| {
            CreateOrderAction { request }.execute(ctx)
        })
    }

    /// Cancel `quantity` units of a batch (user)
    pub fn cancel_item(
        &self,
        user_id: &str,
        item_id: &str,
        quantity: u32,
        note: Option<String>,
    ) -> ManagerResult<Order> {
        self.run(Utc::now(), |ctx| {
            let (order, _) = CancelItemAction {
                user_id: user_id.to_string(),
                item_id: item_id.to_string(),
                quantity,
                note,
            }
            .execute(ctx)?;
            Ok(order)
        })
    }

    /// Request a return for `quantity` units of a delivered batch (user)
    pub fn request_return(
        &self,
        user_id: &str,
        item_id: &str,
        quantity: u32,
        note: Option<String>,
    ) -> ManagerResult<Order> {
        self.request_return_at(user_id, item_id, quantity, note, Utc::now())
    }

    /// Return request with an explicit clock (window boundary testing)
    pub fn request_return_at(
        &self,
        user_id: &str,
        item_id: &str,
        quantity: u32,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> ManagerResult<Order> {
        self.run(now, |ctx| {
            let (order, _) = RequestReturnAction {
                user_id: user_id.to_string(),
                item_id: item_id.to_string(),
                quantity,
                note,
            }
            .execute(ctx)?;
            Ok(order)
        })
    }

    /// Cancel an in-flight return by return id (user)
    pub fn cancel_return(&self, user_id: &str, return_id: &str) -> ManagerResult<Order> {
        self.run(Utc::now(), |ctx| {
            CancelReturnAction {
                user_id: user_id.to_string(),
                return_id: return_id.to_string(),
            }
            .execute(ctx)
        })
    }

    /// Move `quantity` units of a batch to a new status (admin)
    pub fn update_item_status(
        &self,
        item_id: &str,
        status: ItemStatus,
        quantity: u32,
        note: Option<String>,
    ) -> ManagerResult<Order> {
        self.run(Utc::now(), |ctx| {
            let (order, _) = UpdateItemStatusAction {
                item_id: item_id.to_string(),
                status,
                quantity,
                note,
            }
            .execute(ctx)?;
            Ok(order)
        })
    }

    /// Refund `quantity` units of a cancelled or returned batch (admin);
    /// `None` refunds the whole batch
    pub fn process_refund(
        &self,
        item_id: &str,
        quantity: Option<u32>,
        amount: Option<Decimal>,
    ) -> ManagerResult<Order> {
        self.run(Utc::now(), |ctx| {
            ProcessRefundAction {
                item_id: item_id.to_string(),
                quantity,
                amount,
            }
            .execute(ctx)
        })
    }

    /// Request a refund with a destination account (user, COD)
    pub fn request_refund(
        &self,
        user_id: &str,
        item_id: &str,
        note: Option<String>,
        account_details: RefundAccountDetails,
    ) -> ManagerResult<Order> {
        self.run(Utc::now(), |ctx| {
            RequestRefundAction {
                user_id: user_id.to_string(),
                item_id: item_id.to_string(),
                note,
                account_details,
            }
            .execute(ctx)
        })
    }

    /// Approve or reject a pending refund request (admin)
    pub fn review_refund_request(
        &self,
        item_id: &str,
        approve: bool,
        rejection_reason: Option<String>,
    ) -> ManagerResult<Order> {
        self.run(Utc::now(), |ctx| {
            ReviewRefundAction {
                item_id: item_id.to_string(),
                approve,
                rejection_reason,
            }
            .execute(ctx)
        })
    }

    // ========== Queries ==========

    /// Get an order by id
    pub fn get_order(&self, order_id: &str) -> ManagerResult<Order> {
        self.store
            .get_order(order_id)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()).into())
    }

    /// Get an order by id, scoped to its owner
    pub fn get_order_for_user(&self, user_id: &str, order_id: &str) -> ManagerResult<Order> {
        let order = self.get_order(order_id)?;
        if order.user_id != user_id {
            return Err(OrderError::OrderNotFound(order_id.to_string()).into());
        }
        Ok(order)
    }

    /// A user's orders, most recent first
    pub fn list_orders(&self, user_id: &str) -> ManagerResult<Vec<OrderSummary>> {
        let orders = self.store.list_orders_for_user(user_id)?;
        Ok(orders.iter().map(OrderSummary::from).collect())
    }

    /// All orders with per-status quantity counts (admin)
    pub fn list_all_orders(&self) -> ManagerResult<Vec<AdminOrderSummary>> {
        let orders = self.store.list_all_orders()?;
        Ok(orders.iter().map(AdminOrderSummary::from).collect())
    }

    /// Unit counts per status across every order (admin dashboard)
    pub fn status_summary(&self) -> ManagerResult<HashMap<ItemStatus, u32>> {
        let orders = self.store.list_all_orders()?;
        let mut summary: HashMap<ItemStatus, u32> = HashMap::new();
        for order in &orders {
            for item in &order.items {
                *summary.entry(item.order_status).or_default() += item.quantity;
            }
        }
        Ok(summary)
    }

    /// All batches carrying a return id (admin), open requests first
    pub fn list_return_requests(&self) -> ManagerResult<Vec<ReturnRequestView>> {
        let orders = self.store.list_all_orders()?;
        let mut views = Vec::new();
        for order in &orders {
            for item in &order.items {
                if let Some(return_id) = &item.return_id {
                    views.push(ReturnRequestView {
                        return_id: return_id.clone(),
                        order_id: order.order_id.clone(),
                        user_id: order.user_id.clone(),
                        item_id: item.item_id.clone(),
                        status: item.order_status,
                        quantity: item.quantity,
                        requested_at: item.return_requested_at,
                        note: item.return_request_note.clone(),
                    });
                }
            }
        }
        views.sort_by_key(|v| !v.status.is_return_related());
        Ok(views)
    }
}

#[cfg(test)]
mod tests;
