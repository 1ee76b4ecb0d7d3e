//! User refund requests and admin review
//!
//! COD purchases have no gateway transaction to reverse, so the user supplies
//! a refund destination (bank account or UPI) and an admin reviews the
//! request. Approval processes the refund in the same transaction; rejection
//! records the reason and leaves the batch status untouched.

use shared::error::ErrorCode;
use shared::order::{ItemStatus, Order, PaymentStatus, RefundAccountDetails};

use super::OpContext;
use super::process_refund::ProcessRefundAction;
use crate::orders::manager::OrderError;

/// RequestRefund action (user)
#[derive(Debug, Clone)]
pub struct RequestRefundAction {
    pub user_id: String,
    pub item_id: String,
    pub note: Option<String>,
    pub account_details: RefundAccountDetails,
}

impl RequestRefundAction {
    pub fn execute(&self, ctx: &OpContext<'_>) -> Result<Order, OrderError> {
        if !self.account_details.has_destination() {
            return Err(OrderError::coded(
                ErrorCode::ValidationFailed,
                "Refund account details need a UPI id or a bank account number",
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

        if order.user_id != self.user_id {
            return Err(OrderError::ItemNotFound(self.item_id.clone()));
        }

        let item = order
            .find_item_mut(&self.item_id)
            .ok_or_else(|| OrderError::ItemNotFound(self.item_id.clone()))?;

        if !matches!(
            item.order_status,
            ItemStatus::Cancelled | ItemStatus::Returned
        ) {
            return Err(OrderError::coded(
                ErrorCode::RefundNotEligible,
                format!(
                    "Refunds apply to cancelled or returned items, not {}",
                    item.order_status
                ),
            ));
        }
        if item.refund_status == Some(PaymentStatus::Refunded) {
            return Err(OrderError::coded(
                ErrorCode::RefundAlreadyProcessed,
                format!("Item already refunded: {}", self.item_id),
            ));
        }
        if item.refund_status == Some(PaymentStatus::Pending) {
            return Err(OrderError::coded(
                ErrorCode::RefundAlreadyRequested,
                format!("Refund already requested for item: {}", self.item_id),
            ));
        }

        item.refund_requested_at = Some(ctx.now);
        item.refund_request_note = self.note.clone();
        item.refund_account_details = Some(self.account_details.clone());
        item.refund_amount = Some(item.amount.total_amount);
        item.refund_status = Some(PaymentStatus::Pending);
        // A re-request after rejection starts a fresh review
        item.refund_rejected_at = None;
        item.refund_rejection_reason = None;
        let status = item.order_status;
        item.push_history(status, Some("Refund requested".to_string()), ctx.now);
        order.updated_at = ctx.now;

        ctx.store.put_order_txn(ctx.txn, &order)?;
        tracing::info!(
            order_id = %order.order_id,
            item_id = %self.item_id,
            "Refund requested"
        );
        Ok(order)
    }
}

/// ReviewRefund action (admin)
#[derive(Debug, Clone)]
pub struct ReviewRefundAction {
    pub item_id: String,
    pub approve: bool,
    pub rejection_reason: Option<String>,
}

impl ReviewRefundAction {
    pub fn execute(&self, ctx: &OpContext<'_>) -> Result<Order, OrderError> {
        let order_id = ctx
            .store
            .find_order_id_by_item_txn(ctx.txn, &self.item_id)?
            .ok_or_else(|| OrderError::ItemNotFound(self.item_id.clone()))?;
        let mut order = ctx
            .store
            .get_order_txn(ctx.txn, &order_id)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.clone()))?;

        {
            let item = order
                .find_item(&self.item_id)
                .ok_or_else(|| OrderError::ItemNotFound(self.item_id.clone()))?;
            if item.refund_status == Some(PaymentStatus::Refunded) {
                return Err(OrderError::coded(
                    ErrorCode::RefundAlreadyProcessed,
                    format!("Item already refunded: {}", self.item_id),
                ));
            }
            if item.refund_status != Some(PaymentStatus::Pending) {
                return Err(OrderError::coded(
                    ErrorCode::InvalidRequest,
                    format!("No pending refund request for item: {}", self.item_id),
                ));
            }
        }

        if self.approve {
            let item = order
                .find_item_mut(&self.item_id)
                .ok_or_else(|| OrderError::ItemNotFound(self.item_id.clone()))?;
            item.refund_approved_at = Some(ctx.now);
            order.updated_at = ctx.now;
            ctx.store.put_order_txn(ctx.txn, &order)?;

            let process = ProcessRefundAction {
                item_id: self.item_id.clone(),
                quantity: None,
                amount: None,
            };
            let order = process.execute(ctx)?;
            tracing::info!(
                order_id = %order.order_id,
                item_id = %self.item_id,
                "Refund request approved"
            );
            Ok(order)
        } else {
            let reason = self.rejection_reason.clone().ok_or_else(|| {
                OrderError::coded(
                    ErrorCode::ValidationFailed,
                    "A rejection reason is required",
                )
            })?;
            let item = order
                .find_item_mut(&self.item_id)
                .ok_or_else(|| OrderError::ItemNotFound(self.item_id.clone()))?;
            item.refund_rejected_at = Some(ctx.now);
            item.refund_rejection_reason = Some(reason);
            item.refund_status = Some(PaymentStatus::Failed);
            order.updated_at = ctx.now;

            ctx.store.put_order_txn(ctx.txn, &order)?;
            tracing::info!(
                order_id = %order.order_id,
                item_id = %self.item_id,
                "Refund request rejected"
            );
            Ok(order)
        }
    }
}
