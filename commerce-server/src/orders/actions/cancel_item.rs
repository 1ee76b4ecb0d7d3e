//! Item cancellation (user-initiated)
//!
//! Cancels `quantity` units of a batch while it is still in `Ordered`. A
//! partial quantity splits the batch; only the split-off part is cancelled.
//! The cancelled batch is stamped with a fresh cancel id for later refund
//! tracking. Stock is not restored.

use shared::order::{ItemStatus, Order};

use super::OpContext;
use crate::orders::ids::unique_cancel_id;
use crate::orders::manager::OrderError;
use crate::orders::transition::{TransitionOutcome, apply_transition};

/// CancelItem action
#[derive(Debug, Clone)]
pub struct CancelItemAction {
    pub user_id: String,
    pub item_id: String,
    pub quantity: u32,
    pub note: Option<String>,
}

impl CancelItemAction {
    pub fn execute(&self, ctx: &OpContext<'_>) -> Result<(Order, TransitionOutcome), OrderError> {
        let order_id = ctx
            .store
            .find_order_id_by_item_txn(ctx.txn, &self.item_id)?
            .ok_or_else(|| OrderError::ItemNotFound(self.item_id.clone()))?;
        let mut order = ctx
            .store
            .get_order_txn(ctx.txn, &order_id)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.clone()))?;

        // Ownership check reads as not-found to avoid leaking other users' ids
        if order.user_id != self.user_id {
            return Err(OrderError::ItemNotFound(self.item_id.clone()));
        }

        let cancel_id = unique_cancel_id(ctx.store, ctx.txn, ctx.max_id_attempts)?;
        let outcome = apply_transition(
            ctx,
            &mut order,
            &self.item_id,
            self.quantity,
            ItemStatus::Cancelled,
            self.note.clone(),
            |item| {
                item.cancel_id = Some(cancel_id);
                item.cancelled_at = Some(ctx.now);
            },
        )?;

        ctx.store.put_order_txn(ctx.txn, &order)?;
        tracing::info!(
            order_id = %order.order_id,
            item_id = %outcome.item_id,
            quantity = self.quantity,
            split = outcome.split,
            "Item cancelled"
        );
        Ok((order, outcome))
    }
}
