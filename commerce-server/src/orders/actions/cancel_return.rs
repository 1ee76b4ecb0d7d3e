//! Return cancellation (user-initiated)
//!
//! Cancels an in-flight return by its return id. Legal from both
//! `ReturnRequested` and `DepartedForReturning`; `ReturnCancelled` is
//! terminal. Request metadata is cleared so the batch no longer reads as an
//! open return, but the return id itself stays for audit lookup.

use shared::order::{ItemStatus, Order};

use super::OpContext;
use crate::orders::manager::OrderError;
use crate::orders::transition::apply_transition;

/// CancelReturn action
#[derive(Debug, Clone)]
pub struct CancelReturnAction {
    pub user_id: String,
    pub return_id: String,
}

impl CancelReturnAction {
    pub fn execute(&self, ctx: &OpContext<'_>) -> Result<Order, OrderError> {
        let order_id = ctx
            .store
            .find_order_id_by_return_txn(ctx.txn, &self.return_id)?
            .ok_or_else(|| OrderError::ReturnNotFound(self.return_id.clone()))?;
        let mut order = ctx
            .store
            .get_order_txn(ctx.txn, &order_id)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.clone()))?;

        if order.user_id != self.user_id {
            return Err(OrderError::ReturnNotFound(self.return_id.clone()));
        }

        let item = order
            .find_item_by_return_id(&self.return_id)
            .ok_or_else(|| OrderError::ReturnNotFound(self.return_id.clone()))?;
        let item_id = item.item_id.clone();
        let quantity = item.quantity;

        let outcome = apply_transition(
            ctx,
            &mut order,
            &item_id,
            quantity,
            ItemStatus::ReturnCancelled,
            None,
            |item| {
                item.return_cancelled_at = Some(ctx.now);
                item.return_requested_at = None;
                item.return_request_note = None;
            },
        )?;

        ctx.store.put_order_txn(ctx.txn, &order)?;
        tracing::info!(
            order_id = %order.order_id,
            item_id = %outcome.item_id,
            return_id = %self.return_id,
            "Return cancelled"
        );
        Ok(order)
    }
}
