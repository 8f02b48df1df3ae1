//! Category repository.
//!
//! Reads come in two flavors: raw records holding product ids, and expanded
//! records with every reference resolved to the full product. Expansion is
//! explicit and display-only.

use copperleaf_core::{CategoryId, ProductId};

use super::{MemoryStore, RepositoryError};
use crate::models::{Category, ExpandedCategory, Product};

/// Repository for category records.
pub struct CategoryRepository<'a> {
    store: &'a MemoryStore,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(store: &'a MemoryStore) -> Self {
        Self { store }
    }

    /// Get a category by id, product references expanded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if a referenced product is gone.
    /// Returns `RepositoryError::Unavailable` if the operation deadline elapses.
    pub async fn get_expanded(
        &self,
        id: &CategoryId,
    ) -> Result<Option<ExpandedCategory>, RepositoryError> {
        self.store
            .guarded(async {
                let categories = self.store.categories.read().await;
                let products = self.store.products.read().await;
                match categories.by_id.get(id) {
                    Some(category) => expand(category, &products).map(Some),
                    None => Ok(None),
                }
            })
            .await?
    }

    /// Get a category by its unique name, product references expanded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if a referenced product is gone.
    /// Returns `RepositoryError::Unavailable` if the operation deadline elapses.
    pub async fn get_by_name_expanded(
        &self,
        name: &str,
    ) -> Result<Option<ExpandedCategory>, RepositoryError> {
        self.store
            .guarded(async {
                let categories = self.store.categories.read().await;
                let products = self.store.products.read().await;
                match categories
                    .name_index
                    .get(name)
                    .and_then(|id| categories.by_id.get(id))
                {
                    Some(category) => expand(category, &products).map(Some),
                    None => Ok(None),
                }
            })
            .await?
    }

    /// List all categories, product references expanded, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if a referenced product is gone.
    /// Returns `RepositoryError::Unavailable` if the operation deadline elapses.
    pub async fn list_expanded(&self) -> Result<Vec<ExpandedCategory>, RepositoryError> {
        self.store
            .guarded(async {
                let categories = self.store.categories.read().await;
                let products = self.store.products.read().await;
                let mut all = Vec::with_capacity(categories.by_id.len());
                for category in categories.by_id.values() {
                    all.push(expand(category, &products)?);
                }
                all.sort_by(|a, b| a.name.cmp(&b.name));
                Ok(all)
            })
            .await?
    }

    /// Insert a new category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is already taken.
    /// Returns `RepositoryError::Unavailable` if the operation deadline elapses.
    pub async fn create(&self, category: Category) -> Result<Category, RepositoryError> {
        self.store
            .guarded(async {
                let mut categories = self.store.categories.write().await;

                if categories.name_index.contains_key(&category.name) {
                    return Err(RepositoryError::Conflict(
                        "category name already exists".to_owned(),
                    ));
                }

                categories
                    .name_index
                    .insert(category.name.clone(), category.id.clone());
                categories.by_id.insert(category.id.clone(), category.clone());
                Ok(category)
            })
            .await?
    }

    /// Append a product reference to a category's product list.
    ///
    /// Appending an already-listed product is a no-op: the list has set
    /// semantics despite its array representation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    /// Returns `RepositoryError::Unavailable` if the operation deadline elapses.
    pub async fn append_product(
        &self,
        id: &CategoryId,
        product_id: ProductId,
    ) -> Result<Category, RepositoryError> {
        self.store
            .guarded(async {
                let mut categories = self.store.categories.write().await;
                let category = categories.by_id.get_mut(id).ok_or(RepositoryError::NotFound)?;

                if !category.products.contains(&product_id) {
                    category.products.push(product_id);
                }

                Ok(category.clone())
            })
            .await?
    }
}

/// Resolve a category's product references against the products collection.
fn expand(
    category: &Category,
    products: &std::collections::HashMap<ProductId, Product>,
) -> Result<ExpandedCategory, RepositoryError> {
    let mut expanded = Vec::with_capacity(category.products.len());
    for product_id in &category.products {
        let product = products.get(product_id).ok_or_else(|| {
            RepositoryError::DataCorruption(format!(
                "category {} references missing product {product_id}",
                category.id
            ))
        })?;
        expanded.push(product.clone());
    }

    Ok(ExpandedCategory {
        id: category.id.clone(),
        name: category.name.clone(),
        products: expanded,
    })
}
