//! Cart models.

use serde::{Deserialize, Serialize};

use copperleaf_core::{CartId, Price, ProductId, UserId};

use super::Product;

/// A single cart line: a product reference and how many units of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    /// Always at least 1; a removal deletes the line instead of zeroing it.
    pub quantity: u32,
}

/// A user's cart.
///
/// At most one cart exists per user. `total_price` is derived: it is
/// recomputed against current product prices on every mutation, never on
/// read. `version` backs the optimistic compare-and-swap in the store so
/// concurrent mutations cannot lose an update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    /// At most one entry per distinct product id.
    pub items: Vec<CartItem>,
    pub total_price: Price,
    #[serde(skip)]
    pub version: u64,
}

impl Cart {
    /// A fresh, empty cart for a user.
    #[must_use]
    pub fn empty(user_id: UserId) -> Self {
        Self {
            id: CartId::generate(),
            user_id,
            items: Vec::new(),
            total_price: Price::ZERO,
            version: 0,
        }
    }

    /// Find the position of the line holding `product_id`, if any.
    #[must_use]
    pub fn position_of(&self, product_id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| &item.product_id == product_id)
    }
}

/// A cart line with its product reference expanded to the full record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedCartItem {
    pub product: Product,
    pub quantity: u32,
}

/// A cart as returned by reads: every line's product expanded for display.
///
/// The expansion does not affect `total_price`, which is the stored
/// write-time snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedCart {
    pub id: CartId,
    pub user_id: UserId,
    pub items: Vec<ExpandedCartItem>,
    pub total_price: Price,
}
