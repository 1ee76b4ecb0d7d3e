//! Order aggregate and order-item batch types
//!
//! An [`Order`] owns an ordered sequence of [`OrderItem`] batches. Product,
//! color, and price data are denormalized snapshots taken at order time so
//! later catalog edits never alter historical orders. Money values use
//! [`Decimal`] rounded to two places.

use super::status::{ItemStatus, overall_status};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Rounding for monetary values (2 decimal places)
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Payment method selected at checkout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cod,
    Online,
}

/// Payment gateway linkage state, populated by the payment collaborator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

/// External payment provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentProvider {
    Razorpay,
    Cashfree,
}

/// Garment size
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Size {
    S,
    M,
    L,
    XL,
    XXL,
    XXXL,
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
            Self::XL => "XL",
            Self::XXL => "XXL",
            Self::XXXL => "XXXL",
        };
        f.write_str(s)
    }
}

/// Address snapshot taken at order time (copied, never referenced)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingInfo {
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub phone: String,
}

/// Image reference snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ImageRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub secure_url: String,
}

/// Product snapshot on an order item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRef {
    pub product_id: String,
    pub name: String,
    pub image: ImageRef,
}

/// Color snapshot on an order item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColorRef {
    pub name: String,
    pub hex_code: String,
}

/// Per-unit and per-line money, computed server-side at order time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Amount {
    pub unit_price: Decimal,
    pub shipping_charges: Decimal,
    pub total_amount: Decimal,
}

impl Amount {
    /// Compute the line amount: `unit_price * quantity + shipping_charges`,
    /// rounded to two decimal places.
    pub fn from_unit_price(unit_price: Decimal, shipping_charges: Decimal, quantity: u32) -> Self {
        let total = (unit_price * Decimal::from(quantity) + shipping_charges)
            .round_dp(MONEY_DECIMAL_PLACES);
        Self {
            unit_price: unit_price.round_dp(MONEY_DECIMAL_PLACES),
            shipping_charges: shipping_charges.round_dp(MONEY_DECIMAL_PLACES),
            total_amount: total,
        }
    }
}

/// One entry in a batch's append-only audit trail
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusHistoryEntry {
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub changed_at: DateTime<Utc>,
}

/// Refund destination account details supplied by the user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefundAccountDetails {
    pub account_type: RefundAccountType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ifsc_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_holder_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upi_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl RefundAccountDetails {
    /// A usable destination needs either a UPI id or a bank account number
    pub fn has_destination(&self) -> bool {
        self.upi_id.is_some() || self.account_number.is_some()
    }
}

/// Refund account type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefundAccountType {
    Bank,
    Upi,
}

/// One order-item batch: `quantity` identical units sharing one status
///
/// Owned exclusively by its [`Order`]. The item id (and cancel/return ids,
/// once assigned) are globally unique across all orders for direct lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Globally unique item id (`ITM-…`)
    pub item_id: String,
    pub product: ProductRef,
    pub color: ColorRef,
    pub size: Size,
    /// Batch quantity, always positive
    pub quantity: u32,
    pub amount: Amount,
    pub order_status: ItemStatus,
    /// Append-only audit trail; entries are never edited or removed
    pub status_history: Vec<StatusHistoryEntry>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_requested_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returned_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_cancelled_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_request_note: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_processed_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_requested_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_request_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_account_details: Option<RefundAccountDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_approved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_rejected_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_rejection_reason: Option<String>,
}

impl OrderItem {
    /// Create a freshly ordered batch with its initial history entry
    pub fn new(
        item_id: String,
        product: ProductRef,
        color: ColorRef,
        size: Size,
        quantity: u32,
        amount: Amount,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            item_id,
            product,
            color,
            size,
            quantity,
            amount,
            order_status: ItemStatus::Ordered,
            status_history: vec![StatusHistoryEntry {
                status: ItemStatus::Ordered,
                note: Some("Order placed".to_string()),
                changed_at: now,
            }],
            cancel_id: None,
            cancelled_at: None,
            return_id: None,
            return_requested_at: None,
            returned_at: None,
            return_cancelled_at: None,
            return_request_note: None,
            refund_amount: None,
            refund_status: None,
            refund_processed_at: None,
            refund_requested_at: None,
            refund_request_note: None,
            refund_account_details: None,
            refund_approved_at: None,
            refund_rejected_at: None,
            refund_rejection_reason: None,
        }
    }

    /// Append a history entry (the only way the audit trail grows)
    pub fn push_history(
        &mut self,
        status: ItemStatus,
        note: Option<String>,
        changed_at: DateTime<Utc>,
    ) {
        self.status_history.push(StatusHistoryEntry {
            status,
            note,
            changed_at,
        });
    }

    /// Timestamp of the first `Delivered` history entry, if any
    pub fn delivered_at(&self) -> Option<DateTime<Utc>> {
        self.status_history
            .iter()
            .find(|e| e.status == ItemStatus::Delivered)
            .map(|e| e.changed_at)
    }
}

/// Order aggregate root
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Globally unique, human-readable order id (`ORD-…`)
    pub order_id: String,
    /// Purchasing account, immutable after creation
    pub user_id: String,
    /// Batches, in creation/split order
    pub items: Vec<OrderItem>,
    pub shipping_info: ShippingInfo,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_provider: Option<PaymentProvider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub payment_status: PaymentStatus,
    pub ordered_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Find a batch by item id
    pub fn find_item(&self, item_id: &str) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.item_id == item_id)
    }

    /// Find a batch by item id, mutably
    pub fn find_item_mut(&mut self, item_id: &str) -> Option<&mut OrderItem> {
        self.items.iter_mut().find(|i| i.item_id == item_id)
    }

    /// Find a batch by return id
    pub fn find_item_by_return_id(&self, return_id: &str) -> Option<&OrderItem> {
        self.items
            .iter()
            .find(|i| i.return_id.as_deref() == Some(return_id))
    }

    /// Derived overall status (pure function of current item statuses)
    pub fn overall_status(&self) -> ItemStatus {
        let statuses: Vec<ItemStatus> = self.items.iter().map(|i| i.order_status).collect();
        overall_status(&statuses)
    }

    /// Sum of all line totals
    pub fn total_amount(&self) -> Decimal {
        self.items.iter().map(|i| i.amount.total_amount).sum()
    }

    /// Sum of all batch quantities
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}
