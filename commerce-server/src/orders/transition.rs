//! Split-or-mutate transition engine
//!
//! Every status change on an order-item batch flows through
//! [`apply_transition`]. It validates against the static transition table,
//! then either mutates the whole batch in place (full quantity) or splits the
//! batch into two siblings and transitions only the split-off part (partial
//! quantity). Validation failures leave the order untouched.
//!
//! Split invariants:
//! - quantities of the two siblings sum to the original batch quantity
//! - the split-off batch gets a fresh globally-unique item id; inherited
//!   cancel/return ids are re-minted so no id is ever held by two batches
//! - both siblings carry the full history up to the split; only the
//!   split-off batch gains the new transition entry
//! - shipping charges stay on the original batch, never duplicated

use rust_decimal::Decimal;
use shared::order::{Amount, ItemStatus, Order, OrderItem};

use super::actions::OpContext;
use super::ids::{unique_cancel_id, unique_item_id, unique_return_id};
use super::manager::OrderError;

/// Result of one transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    /// The batch that now carries the target status. On a split this is the
    /// newly minted sibling, not the original item id.
    pub item_id: String,
    pub split: bool,
}

/// Transition `quantity` units of a batch to `target`.
///
/// `mutate` runs on the batch that carries the new status (the original on a
/// full-quantity transition, the split-off sibling on a partial one) after
/// the status and history entry are set. Use it to stamp operation-specific
/// fields like cancel/return ids and timestamps.
pub fn apply_transition(
    ctx: &OpContext<'_>,
    order: &mut Order,
    item_id: &str,
    quantity: u32,
    target: ItemStatus,
    note: Option<String>,
    mutate: impl FnOnce(&mut OrderItem),
) -> Result<TransitionOutcome, OrderError> {
    let idx = order
        .items
        .iter()
        .position(|i| i.item_id == item_id)
        .ok_or_else(|| OrderError::ItemNotFound(item_id.to_string()))?;

    let current = order.items[idx].order_status;
    if !current.can_transition(target) {
        return Err(OrderError::InvalidTransition {
            from: current,
            to: target,
        });
    }

    let available = order.items[idx].quantity;
    if quantity == 0 || quantity > available {
        return Err(OrderError::InvalidQuantity {
            requested: quantity,
            available,
        });
    }

    if quantity == available {
        let item = &mut order.items[idx];
        item.order_status = target;
        item.push_history(target, note, ctx.now);
        mutate(item);
        order.updated_at = ctx.now;
        return Ok(TransitionOutcome {
            item_id: item_id.to_string(),
            split: false,
        });
    }

    // Partial quantity: split the batch. Mint the sibling id before touching
    // anything so an id-generation failure aborts with the order intact.
    let new_item_id = unique_item_id(ctx.store, ctx.txn, ctx.max_id_attempts, &[])?;

    let mut split_off = order.items[idx].clone();
    split_off.item_id = new_item_id.clone();
    // Cancel and return ids stay unique per batch; a clone that inherits one
    // gets its own. `mutate` may still overwrite with an id the caller minted.
    if split_off.cancel_id.is_some() {
        split_off.cancel_id = Some(unique_cancel_id(ctx.store, ctx.txn, ctx.max_id_attempts)?);
    }
    if split_off.return_id.is_some() {
        split_off.return_id = Some(unique_return_id(ctx.store, ctx.txn, ctx.max_id_attempts)?);
    }
    split_off.quantity = quantity;
    split_off.amount = Amount::from_unit_price(split_off.amount.unit_price, Decimal::ZERO, quantity);
    split_off.order_status = target;
    split_off.push_history(target, note, ctx.now);
    mutate(&mut split_off);

    let original = &mut order.items[idx];
    original.quantity = available - quantity;
    original.amount = Amount::from_unit_price(
        original.amount.unit_price,
        original.amount.shipping_charges,
        original.quantity,
    );

    order.items.insert(idx + 1, split_off);
    order.updated_at = ctx.now;

    Ok(TransitionOutcome {
        item_id: new_item_id,
        split: true,
    })
}
