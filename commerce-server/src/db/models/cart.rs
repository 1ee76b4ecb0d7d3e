//! Shopping cart model
//!
//! Carts are keyed by user. Order creation validates requested lines against
//! the cart and removes the ordered (product, color, size) triples on success.

use serde::{Deserialize, Serialize};
use shared::order::Size;

/// One line in a user's cart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartEntry {
    pub product_id: String,
    pub color_id: String,
    pub size: Size,
    pub quantity: u32,
}

/// A user's cart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartEntry>,
}

impl Cart {
    /// Whether the cart holds a line matching the triple
    pub fn contains(&self, product_id: &str, color_id: &str, size: Size) -> bool {
        self.items
            .iter()
            .any(|e| e.product_id == product_id && e.color_id == color_id && e.size == size)
    }

    /// Remove every line matching one of the given triples
    pub fn remove_lines(&mut self, triples: &[(String, String, Size)]) {
        self.items.retain(|e| {
            !triples
                .iter()
                .any(|(p, c, s)| e.product_id == *p && e.color_id == *c && e.size == *s)
        });
    }
}
