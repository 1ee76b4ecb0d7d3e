//! OrdersManager tests
//!
//! Shared fixtures: an in-memory store seeded with one product (two sizes),
//! its color, and a cart for the test user. Submodules cover the core
//! operations, full lifecycle flows, boundary conditions, and concurrency.

mod test_core;

use super::*;
use crate::db::models::{CartEntry, Color, PriceInfo, Product, SizeStock, Variant};
use crate::orders::actions::{CreateOrderRequest, OrderLineRequest};
use crate::orders::storage::CommerceStore;
use shared::order::{ImageRef, ItemStatus, Order, Size};

pub(super) const USER: &str = "user-1";
pub(super) const PRODUCT: &str = "prod-1";
pub(super) const COLOR: &str = "color-1";

pub(super) fn seeded_store() -> CommerceStore {
    seeded_store_with_stock(10)
}

pub(super) fn seeded_store_with_stock(stock_m: u32) -> CommerceStore {
    let store = CommerceStore::open_in_memory().unwrap();
    store
        .put_product(&Product {
            product_id: PRODUCT.to_string(),
            name: "Boxy Hoodie".to_string(),
            description: String::new(),
            is_active: true,
            is_on_sale: false,
            non_sale_price: PriceInfo {
                price: "1299.00".parse().unwrap(),
                discounted_price: "999.00".parse().unwrap(),
            },
            sale_price: None,
            variants: vec![Variant {
                color_id: COLOR.to_string(),
                order_image: ImageRef {
                    id: None,
                    secure_url: "/img/hoodie.jpg".to_string(),
                },
                images: vec![],
                sizes: vec![
                    SizeStock {
                        size: Size::M,
                        stock: stock_m,
                    },
                    SizeStock {
                        size: Size::L,
                        stock: 1,
                    },
                ],
            }],
        })
        .unwrap();
    store
        .put_color(&Color {
            color_id: COLOR.to_string(),
            name: "Black".to_string(),
            hex_code: "#000000".to_string(),
            is_active: true,
        })
        .unwrap();
    store
}

pub(super) fn seed_cart(store: &CommerceStore, user_id: &str, size: Size, quantity: u32) {
    let mut cart = store.get_cart(user_id).unwrap().unwrap_or_default();
    cart.items.push(CartEntry {
        product_id: PRODUCT.to_string(),
        color_id: COLOR.to_string(),
        size,
        quantity,
    });
    store.put_cart(user_id, &cart).unwrap();
}

pub(super) fn manager() -> OrdersManager {
    OrdersManager::with_store(seeded_store())
}

pub(super) fn line(size: Size, quantity: u32) -> OrderLineRequest {
    OrderLineRequest {
        product_id: PRODUCT.to_string(),
        color_id: COLOR.to_string(),
        size,
        quantity,
    }
}

/// Seed a cart line and place a COD order for it
pub(super) fn place_order(manager: &OrdersManager, quantity: u32) -> Order {
    seed_cart(manager.store(), USER, Size::M, quantity);
    manager
        .create_order(CreateOrderRequest::cod(USER, vec![line(Size::M, quantity)]))
        .unwrap()
}

/// Walk a batch through Shipped then Delivered
pub(super) fn deliver(manager: &OrdersManager, item_id: &str, quantity: u32) -> Order {
    manager
        .update_item_status(item_id, ItemStatus::Shipped, quantity, None)
        .unwrap();
    manager
        .update_item_status(item_id, ItemStatus::Delivered, quantity, None)
        .unwrap()
}

pub(super) fn stock_of(manager: &OrdersManager, size: Size) -> u32 {
    let product = manager.store().get_product(PRODUCT).unwrap().unwrap();
    product
        .variant(COLOR)
        .unwrap()
        .size_stock(size)
        .unwrap()
        .stock
}
