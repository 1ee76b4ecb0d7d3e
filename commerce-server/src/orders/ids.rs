//! Unique identifier generation
//!
//! Identifiers are `PREFIX-XXXXXXXX` (8 uppercase hex chars from 4 random
//! bytes). Candidates are checked for collision against the store inside the
//! caller's open write transaction, so a generated id is unique for the
//! lifetime of that transaction. After `max_attempts` collisions the operation
//! fails with a retryable error rather than looping forever.

use redb::WriteTransaction;
use shared::error::ErrorCode;
use shared::util::generate_id;

use super::manager::OrderError;
use super::storage::CommerceStore;

pub const ORDER_ID_PREFIX: &str = "ORD";
pub const ITEM_ID_PREFIX: &str = "ITM";
pub const CANCEL_ID_PREFIX: &str = "CNL";
pub const RETURN_ID_PREFIX: &str = "RTN";

fn generate_unique<F>(
    prefix: &str,
    max_attempts: u32,
    mut exists: F,
) -> Result<String, OrderError>
where
    F: FnMut(&str) -> Result<bool, OrderError>,
{
    for _ in 0..max_attempts {
        let candidate = generate_id(prefix);
        if !exists(&candidate)? {
            return Ok(candidate);
        }
    }
    Err(OrderError::Code {
        code: ErrorCode::DuplicateIdentifier,
        message: format!("could not generate a unique {prefix} id after {max_attempts} attempts"),
    })
}

/// A fresh order id not present in the store
pub fn unique_order_id(
    store: &CommerceStore,
    txn: &WriteTransaction,
    max_attempts: u32,
) -> Result<String, OrderError> {
    generate_unique(ORDER_ID_PREFIX, max_attempts, |candidate| {
        Ok(store.order_id_exists_txn(txn, candidate)?)
    })
}

/// A fresh item id not present in the store or in `pending`
///
/// `pending` covers item ids minted earlier in the same operation that have
/// not been written through `put_order_txn` yet.
pub fn unique_item_id(
    store: &CommerceStore,
    txn: &WriteTransaction,
    max_attempts: u32,
    pending: &[String],
) -> Result<String, OrderError> {
    generate_unique(ITEM_ID_PREFIX, max_attempts, |candidate| {
        Ok(pending.iter().any(|id| id == candidate)
            || store.item_id_exists_txn(txn, candidate)?)
    })
}

/// A fresh cancel id not present in the store
pub fn unique_cancel_id(
    store: &CommerceStore,
    txn: &WriteTransaction,
    max_attempts: u32,
) -> Result<String, OrderError> {
    generate_unique(CANCEL_ID_PREFIX, max_attempts, |candidate| {
        Ok(store.cancel_id_exists_txn(txn, candidate)?)
    })
}

/// A fresh return id not present in the store
pub fn unique_return_id(
    store: &CommerceStore,
    txn: &WriteTransaction,
    max_attempts: u32,
) -> Result<String, OrderError> {
    generate_unique(RETURN_ID_PREFIX, max_attempts, |candidate| {
        Ok(store.return_id_exists_txn(txn, candidate)?)
    })
}
