//! Cart engine.
//!
//! Owns the per-user cart aggregate: merging added lines, removing lines,
//! and recomputing the derived total against authoritative product prices.
//!
//! # Consistency
//!
//! Totals are recomputed eagerly on every mutation (write-time aggregation):
//! reads return the stored snapshot without a join, so `total_price` is
//! always Σ quantity × the product price that was current at the last
//! mutation. Recomputation re-resolves the price of **every** line, never
//! assuming the price of the product being added applies to other lines.
//!
//! Mutations are read-modify-write cycles protected by the store's
//! compare-and-swap on the cart version; a lost race is re-read and retried
//! so concurrent adds cannot drop an increment.

use thiserror::Error;
use tracing::instrument;

use copperleaf_core::{Price, ProductId, UserId};

use crate::db::{CartRepository, MemoryStore, ProductRepository, RepositoryError};
use crate::models::{Cart, CartItem, ExpandedCart, Product};

/// Upper bound on compare-and-swap retries before giving up.
const MAX_CAS_ATTEMPTS: u32 = 8;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity must be a positive integer.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// Merging would push the line quantity past the representable maximum.
    #[error("quantity exceeds the maximum for a single cart line")]
    QuantityOverflow,

    /// The referenced product does not exist.
    #[error("product not found")]
    ProductNotFound,

    /// No cart exists for the user.
    #[error("cart not found")]
    CartNotFound,

    /// Store operation failed.
    #[error("store error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Cart engine over the document store.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(store: &'a MemoryStore) -> Self {
        Self {
            carts: CartRepository::new(store),
            products: ProductRepository::new(store),
        }
    }

    /// Add `quantity` units of a product to the user's cart.
    ///
    /// The cart is created lazily on the first add. A line for the same
    /// product merges quantities instead of replacing them.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] if `quantity` is zero, before
    /// any store access.
    /// Returns [`CartError::ProductNotFound`] if the product does not exist;
    /// no cart is created or mutated in that case.
    /// Returns [`CartError::QuantityOverflow`] if merging would exceed the
    /// maximum line quantity; the stored cart is left untouched.
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Cart, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        // One authoritative price fetch for the product being added; its
        // price is reused for that line during recomputation below.
        let product = self
            .products
            .get(&product_id)
            .await?
            .ok_or(CartError::ProductNotFound)?;

        for _ in 0..MAX_CAS_ATTEMPTS {
            let mut cart = match self.carts.find_by_user(&user_id).await? {
                Some(cart) => cart,
                None => match self.carts.insert_new(Cart::empty(user_id.clone())).await {
                    Ok(cart) => cart,
                    // A concurrent first add created the cart between our
                    // read and insert; re-read and merge into it.
                    Err(RepositoryError::Conflict(_)) => continue,
                    Err(e) => return Err(e.into()),
                },
            };

            match cart.position_of(&product_id) {
                Some(index) => {
                    let line = &mut cart.items[index];
                    line.quantity = line
                        .quantity
                        .checked_add(quantity)
                        .ok_or(CartError::QuantityOverflow)?;
                }
                None => cart.items.push(CartItem {
                    product_id: product_id.clone(),
                    quantity,
                }),
            }

            cart.total_price = self.recompute_total(&cart.items, Some(&product)).await?;

            match self.carts.compare_and_swap(cart).await {
                Ok(cart) => return Ok(cart),
                Err(RepositoryError::VersionMismatch) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(CartError::Repository(RepositoryError::Unavailable(
            "cart update contention exceeded retry budget".to_owned(),
        )))
    }

    /// Remove a product's line from the user's cart.
    ///
    /// Removing a product that is not in the cart is a no-op, not an error;
    /// the total is still recomputed against current prices.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CartNotFound`] if the user has no cart.
    #[instrument(skip(self))]
    pub async fn remove_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Cart, CartError> {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let mut cart = self
                .carts
                .find_by_user(&user_id)
                .await?
                .ok_or(CartError::CartNotFound)?;

            cart.items.retain(|item| item.product_id != product_id);
            cart.total_price = self.recompute_total(&cart.items, None).await?;

            match self.carts.compare_and_swap(cart).await {
                Ok(cart) => return Ok(cart),
                Err(RepositoryError::VersionMismatch) => continue,
                Err(RepositoryError::NotFound) => return Err(CartError::CartNotFound),
                Err(e) => return Err(e.into()),
            }
        }

        Err(CartError::Repository(RepositoryError::Unavailable(
            "cart update contention exceeded retry budget".to_owned(),
        )))
    }

    /// Get the user's cart with each line's product expanded to its full
    /// current record.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CartNotFound`] if the user has no cart.
    #[instrument(skip(self))]
    pub async fn get_cart(&self, user_id: UserId) -> Result<ExpandedCart, CartError> {
        self.carts
            .find_by_user_expanded(&user_id)
            .await?
            .ok_or(CartError::CartNotFound)
    }

    /// Recompute the derived total over all lines.
    ///
    /// Every line's price is re-resolved from the store; `just_fetched`
    /// short-circuits the lookup for the product the caller already holds.
    /// A line whose product has vanished is corrupt data, not a client error.
    async fn recompute_total(
        &self,
        items: &[CartItem],
        just_fetched: Option<&Product>,
    ) -> Result<Price, CartError> {
        let mut total = Price::ZERO;

        for item in items {
            let unit_price = match just_fetched {
                Some(product) if product.id == item.product_id => product.price,
                _ => {
                    self.products
                        .get(&item.product_id)
                        .await?
                        .ok_or_else(|| {
                            RepositoryError::DataCorruption(format!(
                                "cart line references missing product {}",
                                item.product_id
                            ))
                        })?
                        .price
                }
            };

            total += unit_price.times(item.quantity);
        }

        Ok(total)
    }
}
