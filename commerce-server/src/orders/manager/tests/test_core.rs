//! Core operation tests: creation, cancellation, refunds, error codes

use super::*;
use crate::db::models::PaymentConfig;
use shared::error::ErrorCode;
use shared::order::{PaymentMethod, PaymentProvider, PaymentStatus};

#[test]
fn test_create_order_snapshots_catalog_and_prices() {
    let manager = manager();
    let order = place_order(&manager, 2);

    assert!(order.order_id.starts_with("ORD-"));
    assert_eq!(order.items.len(), 1);
    let item = &order.items[0];
    assert!(item.item_id.starts_with("ITM-"));
    assert_eq!(item.order_status, ItemStatus::Ordered);
    assert_eq!(item.status_history.len(), 1);
    assert_eq!(item.product.name, "Boxy Hoodie");
    assert_eq!(item.color.name, "Black");

    // price comes from the catalog, not the client
    assert_eq!(item.amount.unit_price, "999.00".parse().unwrap());
    assert_eq!(item.amount.total_amount, "1998.00".parse().unwrap());
    assert_eq!(order.payment_status, PaymentStatus::Pending);
}

#[test]
fn test_create_order_decrements_stock_and_clears_cart() {
    let manager = manager();
    place_order(&manager, 3);

    assert_eq!(stock_of(&manager, Size::M), 7);
    let cart = manager.store().get_cart(USER).unwrap().unwrap();
    assert!(cart.items.is_empty());
}

#[test]
fn test_create_order_requires_at_least_one_line() {
    let manager = manager();
    let err = manager
        .create_order(CreateOrderRequest::cod(USER, vec![]))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationFailed);
}

#[test]
fn test_multi_line_order_decrements_every_line() {
    let manager = manager();
    // two lines against the same product must both land in the stored copy
    seed_cart(manager.store(), USER, Size::M, 2);
    seed_cart(manager.store(), USER, Size::L, 1);
    manager
        .create_order(CreateOrderRequest::cod(
            USER,
            vec![line(Size::M, 2), line(Size::L, 1)],
        ))
        .unwrap();

    assert_eq!(stock_of(&manager, Size::M), 8);
    assert_eq!(stock_of(&manager, Size::L), 0);
}

#[test]
fn test_duplicate_lines_cannot_oversell() {
    let manager = manager();
    // 6 + 6 against stock 10: the second line must see the first decrement
    seed_cart(manager.store(), USER, Size::M, 6);
    let err = manager
        .create_order(CreateOrderRequest::cod(
            USER,
            vec![line(Size::M, 6), line(Size::M, 6)],
        ))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InsufficientStock);
    assert_eq!(stock_of(&manager, Size::M), 10);
}

#[test]
fn test_create_order_rejects_line_missing_from_cart() {
    let manager = manager();
    // cart holds size M, request asks for size L
    seed_cart(manager.store(), USER, Size::M, 1);
    let err = manager
        .create_order(CreateOrderRequest::cod(USER, vec![line(Size::L, 1)]))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::CartMismatch);
}

#[test]
fn test_create_order_insufficient_stock_reserves_nothing() {
    let manager = manager();
    // size L has stock 1; the L line fails after the M line decremented
    seed_cart(manager.store(), USER, Size::M, 2);
    seed_cart(manager.store(), USER, Size::L, 2);
    let err = manager
        .create_order(CreateOrderRequest::cod(
            USER,
            vec![line(Size::M, 2), line(Size::L, 2)],
        ))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InsufficientStock);

    // aborted transaction rolled the M decrement back
    assert_eq!(stock_of(&manager, Size::M), 10);
    assert_eq!(stock_of(&manager, Size::L), 1);
    let cart = manager.store().get_cart(USER).unwrap().unwrap();
    assert_eq!(cart.items.len(), 2);
}

#[test]
fn test_create_order_rejects_inactive_product() {
    let manager = manager();
    let mut product = manager.store().get_product(PRODUCT).unwrap().unwrap();
    product.is_active = false;
    manager.store().put_product(&product).unwrap();

    seed_cart(manager.store(), USER, Size::M, 1);
    let err = manager
        .create_order(CreateOrderRequest::cod(USER, vec![line(Size::M, 1)]))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ProductNotFound);
}

#[test]
fn test_payment_method_gating() {
    let manager = manager();
    manager
        .store()
        .set_payment_config(&PaymentConfig {
            cod_enabled: false,
            online_payment_enabled: false,
        })
        .unwrap();

    seed_cart(manager.store(), USER, Size::M, 1);
    let err = manager
        .create_order(CreateOrderRequest::cod(USER, vec![line(Size::M, 1)]))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::PaymentMethodDisabled);
}

#[test]
fn test_online_payment_status_follows_transaction_id() {
    let manager = manager();
    manager
        .store()
        .set_payment_config(&PaymentConfig {
            cod_enabled: true,
            online_payment_enabled: true,
        })
        .unwrap();

    seed_cart(manager.store(), USER, Size::M, 1);
    let mut request = CreateOrderRequest::cod(USER, vec![line(Size::M, 1)]);
    request.payment_method = PaymentMethod::Online;
    request.payment_provider = Some(PaymentProvider::Razorpay);
    request.transaction_id = Some("txn-12345".to_string());

    let order = manager.create_order(request).unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Paid);
}

#[test]
fn test_online_payment_requires_provider() {
    let manager = manager();
    manager
        .store()
        .set_payment_config(&PaymentConfig {
            cod_enabled: true,
            online_payment_enabled: true,
        })
        .unwrap();

    seed_cart(manager.store(), USER, Size::M, 1);
    let mut request = CreateOrderRequest::cod(USER, vec![line(Size::M, 1)]);
    request.payment_method = PaymentMethod::Online;

    let err = manager.create_order(request).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationFailed);
}

#[test]
fn test_cancel_full_batch_in_place() {
    let manager = manager();
    let order = place_order(&manager, 2);
    let item_id = order.items[0].item_id.clone();

    let updated = manager
        .cancel_item(USER, &item_id, 2, Some("Changed my mind".to_string()))
        .unwrap();

    assert_eq!(updated.items.len(), 1);
    let item = &updated.items[0];
    assert_eq!(item.order_status, ItemStatus::Cancelled);
    assert!(item.cancel_id.as_ref().unwrap().starts_with("CNL-"));
    assert!(item.cancelled_at.is_some());
    assert_eq!(item.status_history.len(), 2);
    assert_eq!(updated.overall_status(), ItemStatus::Cancelled);
}

#[test]
fn test_cancel_by_other_user_reads_as_not_found() {
    let manager = manager();
    let order = place_order(&manager, 1);
    let item_id = order.items[0].item_id.clone();

    let err = manager.cancel_item("user-2", &item_id, 1, None).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ItemNotFound);

    // order untouched
    let order = manager.get_order(&order.order_id).unwrap();
    assert_eq!(order.items[0].order_status, ItemStatus::Ordered);
}

#[test]
fn test_admin_update_rejects_refunded_target() {
    let manager = manager();
    let order = place_order(&manager, 1);
    let item_id = order.items[0].item_id.clone();

    let err = manager
        .update_item_status(&item_id, ItemStatus::Refunded, 1, None)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[test]
fn test_refund_requires_cancelled_or_returned() {
    let manager = manager();
    let order = place_order(&manager, 1);
    let item_id = order.items[0].item_id.clone();

    let err = manager.process_refund(&item_id, None, None).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidTransition);
}

#[test]
fn test_refund_defaults_to_line_total_and_caps_overrides() {
    let manager = manager();
    let order = place_order(&manager, 2);
    let item_id = order.items[0].item_id.clone();
    manager.cancel_item(USER, &item_id, 2, None).unwrap();

    let err = manager
        .process_refund(&item_id, None, Some("99999.00".parse().unwrap()))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationFailed);

    let updated = manager.process_refund(&item_id, None, None).unwrap();
    let item = updated.find_item(&item_id).unwrap();
    assert_eq!(item.order_status, ItemStatus::Refunded);
    assert_eq!(item.refund_amount, Some("1998.00".parse().unwrap()));
    assert_eq!(item.refund_status, Some(PaymentStatus::Refunded));

    let err = manager.process_refund(&item_id, None, None).unwrap_err();
    assert_eq!(err.code(), ErrorCode::RefundAlreadyProcessed);
}

#[test]
fn test_listings() {
    let manager = manager();
    let order = place_order(&manager, 3);
    let item_id = order.items[0].item_id.clone();
    manager.cancel_item(USER, &item_id, 1, None).unwrap();

    let listed = manager.list_orders(USER).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].total_quantity, 3);
    assert_eq!(listed[0].item_count, 2);

    let admin = manager.list_all_orders().unwrap();
    assert_eq!(admin.len(), 1);
    assert_eq!(admin[0].status_quantities[&ItemStatus::Ordered], 2);
    assert_eq!(admin[0].status_quantities[&ItemStatus::Cancelled], 1);

    let summary = manager.status_summary().unwrap();
    assert_eq!(summary[&ItemStatus::Ordered], 2);
    assert_eq!(summary[&ItemStatus::Cancelled], 1);

    assert!(manager.list_orders("user-2").unwrap().is_empty());
}
