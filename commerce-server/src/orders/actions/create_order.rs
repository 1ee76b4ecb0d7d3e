//! Order creation
//!
//! Creates an order from cart-validated lines. Pricing is always computed
//! server-side from the catalog; amounts submitted by the client are never
//! consulted. Stock is checked and decremented for every line inside the
//! transaction, so either all lines reserve stock or none do.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::ErrorCode;
use shared::order::{
    Amount, ColorRef, Order, OrderItem, PaymentMethod, PaymentProvider, PaymentStatus, ProductRef,
    ShippingInfo, Size,
};
use validator::Validate;

use super::OpContext;
use crate::orders::ids::{unique_item_id, unique_order_id};
use crate::orders::manager::OrderError;

/// One requested order line, matched against the user's cart
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderLineRequest {
    #[validate(length(min = 1))]
    pub product_id: String,
    #[validate(length(min = 1))]
    pub color_id: String,
    pub size: Size,
    #[validate(range(min = 1))]
    pub quantity: u32,
}

/// Shipping details submitted at checkout
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ShippingDetails {
    #[validate(length(min = 1, max = 200))]
    pub address: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 100))]
    pub state: String,
    #[validate(length(min = 1, max = 100))]
    pub country: String,
    #[validate(length(min = 3, max = 20))]
    pub postal_code: String,
    #[validate(length(min = 7, max = 15))]
    pub phone: String,
}

impl From<ShippingDetails> for ShippingInfo {
    fn from(d: ShippingDetails) -> Self {
        Self {
            address: d.address,
            city: d.city,
            state: d.state,
            country: d.country,
            postal_code: d.postal_code,
            phone: d.phone,
        }
    }
}

/// Checkout request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[validate(length(min = 1), nested)]
    pub items: Vec<OrderLineRequest>,
    #[validate(nested)]
    pub shipping_info: ShippingDetails,
    pub payment_method: PaymentMethod,
    pub payment_provider: Option<PaymentProvider>,
    pub transaction_id: Option<String>,
}

/// CreateOrder action
#[derive(Debug, Clone)]
pub struct CreateOrderAction {
    pub request: CreateOrderRequest,
}

impl CreateOrderAction {
    pub fn execute(&self, ctx: &OpContext<'_>) -> Result<Order, OrderError> {
        let req = &self.request;
        req.validate()
            .map_err(|e| OrderError::coded(ErrorCode::ValidationFailed, e.to_string()))?;

        // Payment method gating happens before any mutation
        let payment_config = ctx.store.get_payment_config_txn(ctx.txn)?;
        match req.payment_method {
            PaymentMethod::Cod if !payment_config.cod_enabled => {
                return Err(OrderError::coded(
                    ErrorCode::PaymentMethodDisabled,
                    "Cash on delivery is currently disabled",
                ));
            }
            PaymentMethod::Online if !payment_config.online_payment_enabled => {
                return Err(OrderError::coded(
                    ErrorCode::PaymentMethodDisabled,
                    "Online payment is currently disabled",
                ));
            }
            _ => {}
        }
        if req.payment_method == PaymentMethod::Online && req.payment_provider.is_none() {
            return Err(OrderError::coded(
                ErrorCode::ValidationFailed,
                "payment_provider is required for online payment",
            ));
        }

        // Every requested line must match a cart line exactly
        let cart = ctx
            .store
            .get_cart_txn(ctx.txn, &req.user_id)?
            .unwrap_or_default();
        for line in &req.items {
            if !cart.contains(&line.product_id, &line.color_id, line.size) {
                return Err(OrderError::coded(
                    ErrorCode::CartMismatch,
                    format!(
                        "cart has no line for product {} color {} size {}",
                        line.product_id, line.color_id, line.size
                    ),
                ));
            }
        }

        let order_id = unique_order_id(ctx.store, ctx.txn, ctx.max_id_attempts)?;
        let mut item_ids: Vec<String> = Vec::with_capacity(req.items.len());
        let mut items: Vec<OrderItem> = Vec::with_capacity(req.items.len());

        for line in &req.items {
            let mut product = ctx
                .store
                .get_product_txn(ctx.txn, &line.product_id)?
                .filter(|p| p.is_active)
                .ok_or_else(|| {
                    OrderError::coded(
                        ErrorCode::ProductNotFound,
                        format!("Product not found: {}", line.product_id),
                    )
                })?;

            let color = ctx
                .store
                .get_color_txn(ctx.txn, &line.color_id)?
                .filter(|c| c.is_active)
                .ok_or_else(|| {
                    OrderError::coded(
                        ErrorCode::ColorNotFound,
                        format!("Color not found: {}", line.color_id),
                    )
                })?;

            let unit_price = product.current_price();
            let product_name = product.name.clone();

            let variant = product.variant_mut(&line.color_id).ok_or_else(|| {
                OrderError::coded(
                    ErrorCode::VariantNotFound,
                    format!(
                        "Product {} has no variant for color {}",
                        line.product_id, line.color_id
                    ),
                )
            })?;
            let image = variant.snapshot_image();

            let size_stock = variant.size_stock_mut(line.size).ok_or_else(|| {
                OrderError::coded(
                    ErrorCode::VariantNotFound,
                    format!(
                        "Product {} color {} has no size {}",
                        line.product_id, line.color_id, line.size
                    ),
                )
            })?;
            if size_stock.stock < line.quantity {
                return Err(OrderError::coded(
                    ErrorCode::InsufficientStock,
                    format!(
                        "Insufficient stock for product {} color {} size {}: requested {}, available {}",
                        line.product_id, line.color_id, line.size, line.quantity, size_stock.stock
                    ),
                ));
            }
            size_stock.stock -= line.quantity;
            // Write the decrement back immediately so a later line for the
            // same product reads the reduced stock, not the stored one
            ctx.store.put_product_txn(ctx.txn, &product)?;

            let item_id = unique_item_id(ctx.store, ctx.txn, ctx.max_id_attempts, &item_ids)?;
            item_ids.push(item_id.clone());

            items.push(OrderItem::new(
                item_id,
                ProductRef {
                    product_id: line.product_id.clone(),
                    name: product_name,
                    image,
                },
                ColorRef {
                    name: color.name,
                    hex_code: color.hex_code,
                },
                line.size,
                line.quantity,
                Amount::from_unit_price(unit_price, Decimal::ZERO, line.quantity),
                ctx.now,
            ));
        }

        // COD collects later; online orders are paid once a transaction id
        // arrives from the gateway, pending otherwise
        let payment_status = match req.payment_method {
            PaymentMethod::Cod => PaymentStatus::Pending,
            PaymentMethod::Online => {
                if req.transaction_id.is_some() {
                    PaymentStatus::Paid
                } else {
                    PaymentStatus::Pending
                }
            }
        };

        let order = Order {
            order_id,
            user_id: req.user_id.clone(),
            items,
            shipping_info: req.shipping_info.clone().into(),
            payment_method: req.payment_method,
            payment_provider: req.payment_provider,
            transaction_id: req.transaction_id.clone(),
            payment_status,
            ordered_at: ctx.now,
            created_at: ctx.now,
            updated_at: ctx.now,
        };

        let mut cart = cart;
        let ordered_lines: Vec<(String, String, Size)> = req
            .items
            .iter()
            .map(|l| (l.product_id.clone(), l.color_id.clone(), l.size))
            .collect();
        cart.remove_lines(&ordered_lines);
        ctx.store.put_cart_txn(ctx.txn, &req.user_id, &cart)?;

        ctx.store.put_order_txn(ctx.txn, &order)?;

        tracing::info!(
            order_id = %order.order_id,
            user_id = %order.user_id,
            lines = order.items.len(),
            total = %order.total_amount(),
            "Order created"
        );
        Ok(order)
    }
}

impl CreateOrderRequest {
    /// Test fixture helper lives with the manager tests
    #[cfg(test)]
    pub fn cod(user_id: &str, items: Vec<OrderLineRequest>) -> Self {
        Self {
            user_id: user_id.to_string(),
            items,
            shipping_info: ShippingDetails {
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
        }
    }
}
