//! redb-based storage layer for the commerce backend
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | `Order` | Order aggregates |
//! | `item_index` | `item_id` | `order_id` | Direct item lookup |
//! | `cancel_index` | `cancel_id` | `order_id` | Cancel-id uniqueness + lookup |
//! | `return_index` | `return_id` | `order_id` | Return-id uniqueness + lookup |
//! | `user_orders` | `(user_id, order_id)` | `()` | Per-user listing index |
//! | `products` | `product_id` | `Product` | Catalog incl. stock counters |
//! | `colors` | `color_id` | `Color` | Catalog colors |
//! | `carts` | `user_id` | `Cart` | User carts |
//! | `config` | `key` | JSON | Payment configuration |
//!
//! # Atomic scope
//!
//! One `WriteTransaction` per top-level operation is the atomic
//! scope: redb serializes writers (isolation), a dropped transaction rolls
//! back every table touched (all-or-nothing), and reads through the open
//! transaction see its own writes. Commits are durable when `commit()`
//! returns.

use crate::db::models::{Cart, Color, PaymentConfig, Product};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use shared::order::Order;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Order aggregates: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Item lookup: key = item_id, value = owning order_id
const ITEM_INDEX_TABLE: TableDefinition<&str, &str> = TableDefinition::new("item_index");

/// Cancel-id lookup: key = cancel_id, value = owning order_id
const CANCEL_INDEX_TABLE: TableDefinition<&str, &str> = TableDefinition::new("cancel_index");

/// Return-id lookup: key = return_id, value = owning order_id
const RETURN_INDEX_TABLE: TableDefinition<&str, &str> = TableDefinition::new("return_index");

/// Per-user listing index: key = (user_id, order_id), value = empty
const USER_ORDERS_TABLE: TableDefinition<(&str, &str), ()> = TableDefinition::new("user_orders");

/// Catalog products: key = product_id, value = JSON-serialized Product
const PRODUCTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("products");

/// Catalog colors: key = color_id, value = JSON-serialized Color
const COLORS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("colors");

/// User carts: key = user_id, value = JSON-serialized Cart
const CARTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("carts");

/// Configuration: key = config name, value = JSON
const CONFIG_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("config");

const PAYMENT_CONFIG_KEY: &str = "payment";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Order not found: {0}")]
    OrderNotFound(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Commerce storage backed by redb
#[derive(Clone)]
pub struct CommerceStore {
    db: Arc<Database>,
}

impl CommerceStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    fn init_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(ITEM_INDEX_TABLE)?;
            let _ = write_txn.open_table(CANCEL_INDEX_TABLE)?;
            let _ = write_txn.open_table(RETURN_INDEX_TABLE)?;
            let _ = write_txn.open_table(USER_ORDERS_TABLE)?;
            let _ = write_txn.open_table(PRODUCTS_TABLE)?;
            let _ = write_txn.open_table(COLORS_TABLE)?;
            let _ = write_txn.open_table(CARTS_TABLE)?;
            let _ = write_txn.open_table(CONFIG_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction (the atomic scope)
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Order Operations ==========

    /// Store an order and maintain its lookup indexes (within transaction)
    pub fn put_order_txn(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        {
            let mut orders = txn.open_table(ORDERS_TABLE)?;
            let value = serde_json::to_vec(order)?;
            orders.insert(order.order_id.as_str(), value.as_slice())?;
        }
        {
            let mut items = txn.open_table(ITEM_INDEX_TABLE)?;
            for item in &order.items {
                items.insert(item.item_id.as_str(), order.order_id.as_str())?;
            }
        }
        {
            let mut cancels = txn.open_table(CANCEL_INDEX_TABLE)?;
            for item in &order.items {
                if let Some(cancel_id) = &item.cancel_id {
                    cancels.insert(cancel_id.as_str(), order.order_id.as_str())?;
                }
            }
        }
        {
            let mut returns = txn.open_table(RETURN_INDEX_TABLE)?;
            for item in &order.items {
                if let Some(return_id) = &item.return_id {
                    returns.insert(return_id.as_str(), order.order_id.as_str())?;
                }
            }
        }
        {
            let mut user_orders = txn.open_table(USER_ORDERS_TABLE)?;
            user_orders.insert((order.user_id.as_str(), order.order_id.as_str()), ())?;
        }
        Ok(())
    }

    /// Get an order by order id
    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get an order by order id (within transaction)
    pub fn get_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Option<Order>> {
        let table = txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Resolve the order owning an item id (within transaction)
    pub fn find_order_id_by_item_txn(
        &self,
        txn: &WriteTransaction,
        item_id: &str,
    ) -> StorageResult<Option<String>> {
        let table = txn.open_table(ITEM_INDEX_TABLE)?;
        Ok(table.get(item_id)?.map(|v| v.value().to_string()))
    }

    /// Resolve the order owning a return id (within transaction)
    pub fn find_order_id_by_return_txn(
        &self,
        txn: &WriteTransaction,
        return_id: &str,
    ) -> StorageResult<Option<String>> {
        let table = txn.open_table(RETURN_INDEX_TABLE)?;
        Ok(table.get(return_id)?.map(|v| v.value().to_string()))
    }

    /// Existence check for a candidate order id (within transaction)
    pub fn order_id_exists_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<bool> {
        let table = txn.open_table(ORDERS_TABLE)?;
        Ok(table.get(order_id)?.is_some())
    }

    /// Existence check for a candidate item id (within transaction)
    pub fn item_id_exists_txn(
        &self,
        txn: &WriteTransaction,
        item_id: &str,
    ) -> StorageResult<bool> {
        let table = txn.open_table(ITEM_INDEX_TABLE)?;
        Ok(table.get(item_id)?.is_some())
    }

    /// Existence check for a candidate cancel id (within transaction)
    pub fn cancel_id_exists_txn(
        &self,
        txn: &WriteTransaction,
        cancel_id: &str,
    ) -> StorageResult<bool> {
        let table = txn.open_table(CANCEL_INDEX_TABLE)?;
        Ok(table.get(cancel_id)?.is_some())
    }

    /// Existence check for a candidate return id (within transaction)
    pub fn return_id_exists_txn(
        &self,
        txn: &WriteTransaction,
        return_id: &str,
    ) -> StorageResult<bool> {
        let table = txn.open_table(RETURN_INDEX_TABLE)?;
        Ok(table.get(return_id)?.is_some())
    }

    /// All orders for a user, most recent first
    pub fn list_orders_for_user(&self, user_id: &str) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(USER_ORDERS_TABLE)?;
        let orders_table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in index.range((user_id, "")..=(user_id, "\u{10FFFF}"))? {
            let (key, _) = result?;
            let (_, order_id) = key.value();
            if let Some(value) = orders_table.get(order_id)? {
                orders.push(serde_json::from_slice::<Order>(value.value())?);
            }
        }
        orders.sort_by(|a, b| b.ordered_at.cmp(&a.ordered_at));
        Ok(orders)
    }

    /// All orders in the store, most recent first
    pub fn list_all_orders(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            orders.push(serde_json::from_slice::<Order>(value.value())?);
        }
        orders.sort_by(|a, b| b.ordered_at.cmp(&a.ordered_at));
        Ok(orders)
    }

    // ========== Catalog Operations ==========

    /// Store a product (standalone transaction, used for seeding/admin)
    pub fn put_product(&self, product: &Product) -> StorageResult<()> {
        let txn = self.begin_write()?;
        self.put_product_txn(&txn, product)?;
        txn.commit()?;
        Ok(())
    }

    /// Store a product (within transaction)
    pub fn put_product_txn(&self, txn: &WriteTransaction, product: &Product) -> StorageResult<()> {
        let mut table = txn.open_table(PRODUCTS_TABLE)?;
        let value = serde_json::to_vec(product)?;
        table.insert(product.product_id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Get a product by id
    pub fn get_product(&self, product_id: &str) -> StorageResult<Option<Product>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS_TABLE)?;
        match table.get(product_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get a product by id (within transaction)
    pub fn get_product_txn(
        &self,
        txn: &WriteTransaction,
        product_id: &str,
    ) -> StorageResult<Option<Product>> {
        let table = txn.open_table(PRODUCTS_TABLE)?;
        match table.get(product_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Store a color (standalone transaction)
    pub fn put_color(&self, color: &Color) -> StorageResult<()> {
        let txn = self.begin_write()?;
        {
            let mut table = txn.open_table(COLORS_TABLE)?;
            let value = serde_json::to_vec(color)?;
            table.insert(color.color_id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Get a color by id (within transaction)
    pub fn get_color_txn(
        &self,
        txn: &WriteTransaction,
        color_id: &str,
    ) -> StorageResult<Option<Color>> {
        let table = txn.open_table(COLORS_TABLE)?;
        match table.get(color_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    // ========== Cart Operations ==========

    /// Store a user's cart (standalone transaction)
    pub fn put_cart(&self, user_id: &str, cart: &Cart) -> StorageResult<()> {
        let txn = self.begin_write()?;
        self.put_cart_txn(&txn, user_id, cart)?;
        txn.commit()?;
        Ok(())
    }

    /// Store a user's cart (within transaction)
    pub fn put_cart_txn(
        &self,
        txn: &WriteTransaction,
        user_id: &str,
        cart: &Cart,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(CARTS_TABLE)?;
        let value = serde_json::to_vec(cart)?;
        table.insert(user_id, value.as_slice())?;
        Ok(())
    }

    /// Get a user's cart
    pub fn get_cart(&self, user_id: &str) -> StorageResult<Option<Cart>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CARTS_TABLE)?;
        match table.get(user_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get a user's cart (within transaction)
    pub fn get_cart_txn(
        &self,
        txn: &WriteTransaction,
        user_id: &str,
    ) -> StorageResult<Option<Cart>> {
        let table = txn.open_table(CARTS_TABLE)?;
        match table.get(user_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    // ========== Configuration ==========

    /// Current payment configuration, defaulting when unset
    pub fn get_payment_config(&self) -> StorageResult<PaymentConfig> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CONFIG_TABLE)?;
        match table.get(PAYMENT_CONFIG_KEY)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Ok(PaymentConfig::default()),
        }
    }

    /// Current payment configuration (within transaction)
    pub fn get_payment_config_txn(&self, txn: &WriteTransaction) -> StorageResult<PaymentConfig> {
        let table = txn.open_table(CONFIG_TABLE)?;
        match table.get(PAYMENT_CONFIG_KEY)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Ok(PaymentConfig::default()),
        }
    }

    /// Replace the payment configuration
    pub fn set_payment_config(&self, config: &PaymentConfig) -> StorageResult<()> {
        let txn = self.begin_write()?;
        {
            let mut table = txn.open_table(CONFIG_TABLE)?;
            let value = serde_json::to_vec(config)?;
            table.insert(PAYMENT_CONFIG_KEY, value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }
}

impl std::fmt::Debug for CommerceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommerceStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::order::{
        Amount, ColorRef, ImageRef, Order, OrderItem, PaymentMethod, PaymentStatus, ProductRef,
        ShippingInfo, Size,
    };

    fn test_order(order_id: &str, user_id: &str, item_id: &str) -> Order {
        let now = Utc::now();
        Order {
            order_id: order_id.to_string(),
            user_id: user_id.to_string(),
            items: vec![OrderItem::new(
                item_id.to_string(),
                ProductRef {
                    product_id: "prod-1".to_string(),
                    name: "Tee".to_string(),
                    image: ImageRef {
                        id: None,
                        secure_url: "/img/tee.jpg".to_string(),
                    },
                },
                ColorRef {
                    name: "Black".to_string(),
                    hex_code: "#000000".to_string(),
                },
                Size::M,
                1,
                Amount::from_unit_price("499.00".parse().unwrap(), Default::default(), 1),
                now,
            )],
            shipping_info: ShippingInfo {
                address: "1 Main St".to_string(),
                city: "Pune".to_string(),
                state: "MH".to_string(),
                country: "India".to_string(),
                postal_code: "411001".to_string(),
                phone: "9999999999".to_string(),
            },
            payment_method: PaymentMethod::Cod,
            payment_provider: None,
            transaction_id: None,
            payment_status: PaymentStatus::Pending,
            ordered_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_orders_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("commerce.redb");
        {
            let store = CommerceStore::open(&path).unwrap();
            let order = test_order("ORD-DDDD0001", "user-1", "ITM-DDDD0001");
            let txn = store.begin_write().unwrap();
            store.put_order_txn(&txn, &order).unwrap();
            txn.commit().unwrap();
        }

        let store = CommerceStore::open(&path).unwrap();
        let loaded = store.get_order("ORD-DDDD0001").unwrap().unwrap();
        assert_eq!(loaded.items[0].item_id, "ITM-DDDD0001");
    }

    #[test]
    fn test_order_roundtrip_and_indexes() {
        let store = CommerceStore::open_in_memory().unwrap();
        let order = test_order("ORD-AAAA0001", "user-1", "ITM-AAAA0001");

        let txn = store.begin_write().unwrap();
        store.put_order_txn(&txn, &order).unwrap();
        txn.commit().unwrap();

        let loaded = store.get_order("ORD-AAAA0001").unwrap().unwrap();
        assert_eq!(loaded, order);

        let txn = store.begin_write().unwrap();
        assert!(store.order_id_exists_txn(&txn, "ORD-AAAA0001").unwrap());
        assert!(store.item_id_exists_txn(&txn, "ITM-AAAA0001").unwrap());
        assert_eq!(
            store
                .find_order_id_by_item_txn(&txn, "ITM-AAAA0001")
                .unwrap()
                .as_deref(),
            Some("ORD-AAAA0001")
        );
        assert!(!store.item_id_exists_txn(&txn, "ITM-MISSING0").unwrap());
        drop(txn);
    }

    #[test]
    fn test_uncommitted_writes_roll_back() {
        let store = CommerceStore::open_in_memory().unwrap();
        let order = test_order("ORD-BBBB0001", "user-1", "ITM-BBBB0001");

        let txn = store.begin_write().unwrap();
        store.put_order_txn(&txn, &order).unwrap();
        drop(txn); // abort

        assert!(store.get_order("ORD-BBBB0001").unwrap().is_none());
    }

    #[test]
    fn test_user_listing_sorted_recent_first() {
        let store = CommerceStore::open_in_memory().unwrap();
        let mut first = test_order("ORD-CCCC0001", "user-1", "ITM-CCCC0001");
        first.ordered_at = Utc::now() - chrono::Duration::hours(2);
        let second = test_order("ORD-CCCC0002", "user-1", "ITM-CCCC0002");
        let other = test_order("ORD-CCCC0003", "user-2", "ITM-CCCC0003");

        for order in [&first, &second, &other] {
            let txn = store.begin_write().unwrap();
            store.put_order_txn(&txn, order).unwrap();
            txn.commit().unwrap();
        }

        let listed = store.list_orders_for_user("user-1").unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].order_id, "ORD-CCCC0002");
        assert_eq!(listed[1].order_id, "ORD-CCCC0001");
    }

    #[test]
    fn test_payment_config_defaults_and_update() {
        let store = CommerceStore::open_in_memory().unwrap();
        let config = store.get_payment_config().unwrap();
        assert!(config.cod_enabled);
        assert!(!config.online_payment_enabled);

        store
            .set_payment_config(&PaymentConfig {
                cod_enabled: false,
                online_payment_enabled: true,
            })
            .unwrap();
        let config = store.get_payment_config().unwrap();
        assert!(!config.cod_enabled);
        assert!(config.online_payment_enabled);
    }
}
