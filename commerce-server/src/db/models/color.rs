//! Catalog color model

use serde::{Deserialize, Serialize};

/// A catalog color, referenced by product variants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Color {
    pub color_id: String,
    pub name: String,
    pub hex_code: String,
    pub is_active: bool,
}
