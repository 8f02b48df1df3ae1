//! Cart repository.
//!
//! Carts are keyed by `UserId`, so at most one cart can ever exist per user:
//! uniqueness is structural, not an index that can race. Updates go through
//! [`CartRepository::compare_and_swap`], which admits a write only when the
//! caller read the latest version; a lost race surfaces as
//! [`RepositoryError::VersionMismatch`] and the caller re-reads and retries.

use copperleaf_core::UserId;

use super::{MemoryStore, RepositoryError};
use crate::models::{Cart, ExpandedCart, ExpandedCartItem};

/// Repository for cart records.
pub struct CartRepository<'a> {
    store: &'a MemoryStore,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(store: &'a MemoryStore) -> Self {
        Self { store }
    }

    /// Get a user's cart, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the operation deadline elapses.
    pub async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Cart>, RepositoryError> {
        self.store
            .guarded(async {
                let carts = self.store.carts.read().await;
                carts.get(user_id).cloned()
            })
            .await
    }

    /// Get a user's cart with every line's product expanded to its full
    /// current record (read-time join, display only).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if a line references a
    /// product that no longer exists.
    /// Returns `RepositoryError::Unavailable` if the operation deadline elapses.
    pub async fn find_by_user_expanded(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ExpandedCart>, RepositoryError> {
        self.store
            .guarded(async {
                let carts = self.store.carts.read().await;
                let products = self.store.products.read().await;

                let Some(cart) = carts.get(user_id) else {
                    return Ok(None);
                };

                let mut items = Vec::with_capacity(cart.items.len());
                for item in &cart.items {
                    let product = products.get(&item.product_id).ok_or_else(|| {
                        RepositoryError::DataCorruption(format!(
                            "cart {} references missing product {}",
                            cart.id, item.product_id
                        ))
                    })?;
                    items.push(ExpandedCartItem {
                        product: product.clone(),
                        quantity: item.quantity,
                    });
                }

                Ok(Some(ExpandedCart {
                    id: cart.id.clone(),
                    user_id: cart.user_id.clone(),
                    items,
                    total_price: cart.total_price,
                }))
            })
            .await?
    }

    /// Insert a brand-new cart for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user already has a cart
    /// (a concurrent first add won the race; re-read and retry).
    /// Returns `RepositoryError::Unavailable` if the operation deadline elapses.
    pub async fn insert_new(&self, cart: Cart) -> Result<Cart, RepositoryError> {
        self.store
            .guarded(async {
                let mut carts = self.store.carts.write().await;

                if carts.contains_key(&cart.user_id) {
                    return Err(RepositoryError::Conflict(
                        "cart already exists for user".to_owned(),
                    ));
                }

                let mut stored = cart;
                stored.version = 1;
                carts.insert(stored.user_id.clone(), stored.clone());
                Ok(stored)
            })
            .await?
    }

    /// Replace a cart's contents if nobody wrote it since the caller's read.
    ///
    /// `cart.version` must match the stored version; on success the stored
    /// version is bumped and the persisted cart returned.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cart no longer exists.
    /// Returns `RepositoryError::VersionMismatch` if a concurrent writer won.
    /// Returns `RepositoryError::Unavailable` if the operation deadline elapses.
    pub async fn compare_and_swap(&self, cart: Cart) -> Result<Cart, RepositoryError> {
        self.store
            .guarded(async {
                let mut carts = self.store.carts.write().await;
                let stored = carts
                    .get_mut(&cart.user_id)
                    .ok_or(RepositoryError::NotFound)?;

                if stored.version != cart.version {
                    return Err(RepositoryError::VersionMismatch);
                }

                let mut updated = cart;
                updated.version += 1;
                *stored = updated.clone();
                Ok(updated)
            })
            .await?
    }
}
