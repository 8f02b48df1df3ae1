//! Product repository.

use copperleaf_core::ProductId;

use super::{MemoryStore, RepositoryError};
use crate::models::Product;

/// Repository for product records.
pub struct ProductRepository<'a> {
    store: &'a MemoryStore,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(store: &'a MemoryStore) -> Self {
        Self { store }
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the operation deadline elapses.
    pub async fn get(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        self.store
            .guarded(async {
                let products = self.store.products.read().await;
                products.get(id).cloned()
            })
            .await
    }

    /// List all products, ordered by id for stable output.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the operation deadline elapses.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        self.store
            .guarded(async {
                let products = self.store.products.read().await;
                let mut all: Vec<Product> = products.values().cloned().collect();
                all.sort_by(|a, b| a.id.cmp(&b.id));
                all
            })
            .await
    }

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the operation deadline elapses.
    pub async fn create(&self, product: Product) -> Result<Product, RepositoryError> {
        self.store
            .guarded(async {
                let mut products = self.store.products.write().await;
                products.insert(product.id.clone(), product.clone());
                product
            })
            .await
    }
}
