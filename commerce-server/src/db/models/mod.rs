//! Persistent data models outside the order aggregate

mod cart;
mod color;
mod payment_config;
mod product;

pub use cart::{Cart, CartEntry};
pub use color::Color;
pub use payment_config::PaymentConfig;
pub use product::{PriceInfo, Product, SizeStock, Variant};
