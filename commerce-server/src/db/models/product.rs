//! Catalog product model
//!
//! A product carries one variant per color; each variant holds the per-size
//! stock counters that form the stock ledger. Stock is decremented at order
//! creation inside the same transaction and never restored automatically.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::order::{ImageRef, Size};

/// List/sale price pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceInfo {
    pub price: Decimal,
    pub discounted_price: Decimal,
}

/// Stock counter for one size of a variant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SizeStock {
    pub size: Size,
    pub stock: u32,
}

/// One color variant of a product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variant {
    pub color_id: String,
    pub order_image: ImageRef,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    pub sizes: Vec<SizeStock>,
}

impl Variant {
    /// Stock counter for a size, if the variant carries it
    pub fn size_stock(&self, size: Size) -> Option<&SizeStock> {
        self.sizes.iter().find(|s| s.size == size)
    }

    /// Mutable stock counter for a size
    pub fn size_stock_mut(&mut self, size: Size) -> Option<&mut SizeStock> {
        self.sizes.iter_mut().find(|s| s.size == size)
    }

    /// Best available image for order snapshots: variant gallery first,
    /// then the dedicated order image
    pub fn snapshot_image(&self) -> ImageRef {
        self.images
            .first()
            .cloned()
            .unwrap_or_else(|| self.order_image.clone())
    }
}

/// Catalog product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub is_active: bool,
    #[serde(default)]
    pub is_on_sale: bool,
    pub non_sale_price: PriceInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<PriceInfo>,
    pub variants: Vec<Variant>,
}

impl Product {
    /// Current server-side unit price: the discounted sale price while a
    /// sale is active, otherwise the discounted regular price. Client
    /// submitted prices are never consulted.
    pub fn current_price(&self) -> Decimal {
        if self.is_on_sale
            && let Some(sale) = &self.sale_price
        {
            return sale.discounted_price;
        }
        self.non_sale_price.discounted_price
    }

    /// Variant for a color
    pub fn variant(&self, color_id: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.color_id == color_id)
    }

    /// Mutable variant for a color
    pub fn variant_mut(&mut self, color_id: &str) -> Option<&mut Variant> {
        self.variants.iter_mut().find(|v| v.color_id == color_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn sample_product(on_sale: bool) -> Product {
        Product {
            product_id: "prod-1".to_string(),
            name: "Boxy Hoodie".to_string(),
            description: String::new(),
            is_active: true,
            is_on_sale: on_sale,
            non_sale_price: PriceInfo {
                price: dec("1299.00"),
                discounted_price: dec("999.00"),
            },
            sale_price: Some(PriceInfo {
                price: dec("1299.00"),
                discounted_price: dec("799.00"),
            }),
            variants: vec![Variant {
                color_id: "color-1".to_string(),
                order_image: ImageRef {
                    id: None,
                    secure_url: "/img/hoodie.jpg".to_string(),
                },
                images: vec![],
                sizes: vec![SizeStock {
                    size: Size::M,
                    stock: 5,
                }],
            }],
        }
    }

    #[test]
    fn test_current_price_sale_switch() {
        assert_eq!(sample_product(false).current_price(), dec("999.00"));
        assert_eq!(sample_product(true).current_price(), dec("799.00"));
    }

    #[test]
    fn test_variant_and_size_lookup() {
        let product = sample_product(false);
        let variant = product.variant("color-1").unwrap();
        assert_eq!(variant.size_stock(Size::M).unwrap().stock, 5);
        assert!(variant.size_stock(Size::XL).is_none());
        assert!(product.variant("color-9").is_none());
    }
}
