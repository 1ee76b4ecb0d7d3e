//! Refund processing (admin)
//!
//! Moves a cancelled or returned batch (or part of one) to `Refunded` and
//! records the money side. A partial quantity splits the batch and refunds
//! only the split-off part. The refund amount defaults to the refunded
//! portion's line total and may never exceed it.

use rust_decimal::Decimal;
use shared::error::ErrorCode;
use shared::order::{Amount, ItemStatus, Order, PaymentStatus};

use super::OpContext;
use crate::orders::manager::OrderError;
use crate::orders::transition::apply_transition;

/// ProcessRefund action
#[derive(Debug, Clone)]
pub struct ProcessRefundAction {
    pub item_id: String,
    /// Units to refund; defaults to the whole batch
    pub quantity: Option<u32>,
    /// Refund amount override; defaults to the refunded portion's total
    pub amount: Option<Decimal>,
}

impl ProcessRefundAction {
    pub fn execute(&self, ctx: &OpContext<'_>) -> Result<Order, OrderError> {
        let order_id = ctx
            .store
            .find_order_id_by_item_txn(ctx.txn, &self.item_id)?
            .ok_or_else(|| OrderError::ItemNotFound(self.item_id.clone()))?;
        let mut order = ctx
            .store
            .get_order_txn(ctx.txn, &order_id)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.clone()))?;

        let item = order
            .find_item(&self.item_id)
            .ok_or_else(|| OrderError::ItemNotFound(self.item_id.clone()))?;
        if item.refund_status == Some(PaymentStatus::Refunded) {
            return Err(OrderError::coded(
                ErrorCode::RefundAlreadyProcessed,
                format!("Item already refunded: {}", self.item_id),
            ));
        }

        let available = item.quantity;
        let quantity = self.quantity.unwrap_or(available);
        if quantity == 0 || quantity > available {
            return Err(OrderError::InvalidQuantity {
                requested: quantity,
                available,
            });
        }

        // Shipping charges are only refunded when the whole batch is
        let portion_total = if quantity == available {
            item.amount.total_amount
        } else {
            Amount::from_unit_price(item.amount.unit_price, Decimal::ZERO, quantity).total_amount
        };
        let amount = self.amount.unwrap_or(portion_total);
        if amount <= Decimal::ZERO || amount > portion_total {
            return Err(OrderError::coded(
                ErrorCode::ValidationFailed,
                format!("Refund amount {amount} out of range (portion total {portion_total})"),
            ));
        }

        let outcome = apply_transition(
            ctx,
            &mut order,
            &self.item_id,
            quantity,
            ItemStatus::Refunded,
            None,
            |item| {
                item.refund_amount = Some(amount);
                item.refund_status = Some(PaymentStatus::Refunded);
                item.refund_processed_at = Some(ctx.now);
            },
        )?;

        ctx.store.put_order_txn(ctx.txn, &order)?;
        tracing::info!(
            order_id = %order.order_id,
            item_id = %outcome.item_id,
            amount = %amount,
            "Refund processed"
        );
        Ok(order)
    }
}
