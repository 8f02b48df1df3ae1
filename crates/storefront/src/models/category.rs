//! Category model.

use serde::{Deserialize, Serialize};

use copperleaf_core::{CategoryId, ProductId};

use super::Product;

/// A named grouping of products.
///
/// Holds a weak back-reference list of product ids; attaching a product
/// appends here without touching the product itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    /// Unique across all categories.
    pub name: String,
    pub products: Vec<ProductId>,
}

/// A category with its product references expanded to full records,
/// for read-time display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedCategory {
    pub id: CategoryId,
    pub name: String,
    pub products: Vec<Product>,
}
