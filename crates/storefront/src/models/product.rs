//! Product catalog model.

use serde::{Deserialize, Serialize};

use copperleaf_core::{Price, ProductId};

/// A catalog product.
///
/// Referenced by categories and cart line items by id only; neither owns
/// the product's lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Units in stock. Informational only: nothing in scope reserves stock.
    pub quantity: u32,
    pub price: Price,
    pub description: String,
    pub image: String,
}
