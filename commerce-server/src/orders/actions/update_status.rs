//! Admin status update
//!
//! Moves a batch (or part of it) to any status the transition table allows,
//! stamping the operation-specific fields for the target. Refunds carry
//! money and go through the dedicated refund action instead.

use shared::error::ErrorCode;
use shared::order::{ItemStatus, Order};

use super::OpContext;
use crate::orders::ids::{unique_cancel_id, unique_return_id};
use crate::orders::manager::OrderError;
use crate::orders::transition::{TransitionOutcome, apply_transition};

/// UpdateItemStatus action
#[derive(Debug, Clone)]
pub struct UpdateItemStatusAction {
    pub item_id: String,
    pub status: ItemStatus,
    pub quantity: u32,
    pub note: Option<String>,
}

impl UpdateItemStatusAction {
    pub fn execute(&self, ctx: &OpContext<'_>) -> Result<(Order, TransitionOutcome), OrderError> {
        if self.status == ItemStatus::Refunded {
            return Err(OrderError::coded(
                ErrorCode::InvalidRequest,
                "Refunds are processed through the refund operation",
            ));
        }

        let order_id = ctx
            .store
            .find_order_id_by_item_txn(ctx.txn, &self.item_id)?
            .ok_or_else(|| OrderError::ItemNotFound(self.item_id.clone()))?;
        let mut order = ctx
            .store
            .get_order_txn(ctx.txn, &order_id)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.clone()))?;

        // Ids the target status needs, minted before the transition so an
        // exhausted generator aborts with the order untouched
        let cancel_id = match self.status {
            ItemStatus::Cancelled => Some(unique_cancel_id(ctx.store, ctx.txn, ctx.max_id_attempts)?),
            _ => None,
        };
        let needs_return_id = self.status == ItemStatus::Returned
            && order
                .find_item(&self.item_id)
                .is_some_and(|i| i.return_id.is_none());
        let return_id = if needs_return_id {
            Some(unique_return_id(ctx.store, ctx.txn, ctx.max_id_attempts)?)
        } else {
            None
        };

        let target = self.status;
        let outcome = apply_transition(
            ctx,
            &mut order,
            &self.item_id,
            self.quantity,
            target,
            self.note.clone(),
            |item| match target {
                ItemStatus::Cancelled => {
                    item.cancel_id = cancel_id;
                    item.cancelled_at = Some(ctx.now);
                }
                ItemStatus::Returned => {
                    if let Some(id) = return_id {
                        item.return_id = Some(id);
                    }
                    item.returned_at = Some(ctx.now);
                }
                ItemStatus::ReturnCancelled => {
                    item.return_cancelled_at = Some(ctx.now);
                    item.return_requested_at = None;
                    item.return_request_note = None;
                }
                _ => {}
            },
        )?;

        ctx.store.put_order_txn(ctx.txn, &order)?;
        tracing::info!(
            order_id = %order.order_id,
            item_id = %outcome.item_id,
            status = %self.status,
            quantity = self.quantity,
            split = outcome.split,
            "Item status updated"
        );
        Ok((order, outcome))
    }
}
