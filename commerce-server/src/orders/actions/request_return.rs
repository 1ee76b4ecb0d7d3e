//! Return request (user-initiated)
//!
//! A delivered batch may be returned within the return window. The window is
//! measured in calendar days from the delivery date with both ends truncated
//! to midnight, so a request on day `window_days` succeeds and day
//! `window_days + 1` fails regardless of time of day. A partial quantity
//! splits the batch; the split-off part carries the return request.

use shared::order::{ItemStatus, Order};

use super::OpContext;
use crate::orders::ids::unique_return_id;
use crate::orders::manager::OrderError;
use crate::orders::transition::{TransitionOutcome, apply_transition};

/// RequestReturn action
#[derive(Debug, Clone)]
pub struct RequestReturnAction {
    pub user_id: String,
    pub item_id: String,
    pub quantity: u32,
    pub note: Option<String>,
}

impl RequestReturnAction {
    pub fn execute(&self, ctx: &OpContext<'_>) -> Result<(Order, TransitionOutcome), OrderError> {
        let order_id = ctx
            .store
            .find_order_id_by_item_txn(ctx.txn, &self.item_id)?
            .ok_or_else(|| OrderError::ItemNotFound(self.item_id.clone()))?;
        let mut order = ctx
            .store
            .get_order_txn(ctx.txn, &order_id)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.clone()))?;

        if order.user_id != self.user_id {
            return Err(OrderError::ItemNotFound(self.item_id.clone()));
        }

        let item = order
            .find_item(&self.item_id)
            .ok_or_else(|| OrderError::ItemNotFound(self.item_id.clone()))?;
        if let Some(delivered_at) = item.delivered_at() {
            let elapsed_days = (ctx.now.date_naive() - delivered_at.date_naive()).num_days();
            if elapsed_days > ctx.return_window_days {
                return Err(OrderError::ReturnWindowExpired {
                    delivered_at,
                    window_days: ctx.return_window_days,
                });
            }
        }
        // Without a delivery record the transition table rejects the request

        let return_id = unique_return_id(ctx.store, ctx.txn, ctx.max_id_attempts)?;
        let outcome = apply_transition(
            ctx,
            &mut order,
            &self.item_id,
            self.quantity,
            ItemStatus::ReturnRequested,
            self.note.clone(),
            |item| {
                item.return_id = Some(return_id);
                item.return_requested_at = Some(ctx.now);
                item.return_request_note = self.note.clone();
            },
        )?;

        ctx.store.put_order_txn(ctx.txn, &order)?;
        tracing::info!(
            order_id = %order.order_id,
            item_id = %outcome.item_id,
            quantity = self.quantity,
            split = outcome.split,
            "Return requested"
        );
        Ok((order, outcome))
    }
}
