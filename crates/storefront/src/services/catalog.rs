//! Catalog service.
//!
//! Owns products and categories. Category creation and product attachment
//! are separate store writes: a failure between creating a product and
//! attaching it leaves an orphaned product, which is an accepted gap.

use thiserror::Error;
use tracing::instrument;

use copperleaf_core::{CategoryId, Price, ProductId};

use crate::db::{CategoryRepository, MemoryStore, ProductRepository, RepositoryError};
use crate::models::{Category, ExpandedCategory, Product};

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The referenced product does not exist.
    #[error("product not found")]
    ProductNotFound,

    /// The referenced category does not exist.
    #[error("category not found")]
    CategoryNotFound,

    /// A category with this name already exists.
    #[error("category name already exists")]
    DuplicateCategoryName,

    /// Store operation failed.
    #[error("store error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Fields for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub quantity: u32,
    pub price: Price,
    pub description: String,
    pub image: String,
}

/// Catalog service over the document store.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
    categories: CategoryRepository<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(store: &'a MemoryStore) -> Self {
        Self {
            products: ProductRepository::new(store),
            categories: CategoryRepository::new(store),
        }
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store write fails.
    #[instrument(skip(self, fields))]
    pub async fn create_product(&self, fields: NewProduct) -> Result<Product, CatalogError> {
        let product = Product {
            id: ProductId::generate(),
            name: fields.name,
            quantity: fields.quantity,
            price: fields.price,
            description: fields.description,
            image: fields.image,
        };

        Ok(self.products.create(product).await?)
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if it does not exist.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        self.products
            .get(id)
            .await?
            .ok_or(CatalogError::ProductNotFound)
    }

    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store read fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.list().await?)
    }

    /// Create a category referencing existing products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if any referenced product
    /// does not exist.
    /// Returns `CatalogError::DuplicateCategoryName` if the name is taken.
    #[instrument(skip(self))]
    pub async fn create_category(
        &self,
        name: String,
        product_ids: Vec<ProductId>,
    ) -> Result<Category, CatalogError> {
        for product_id in &product_ids {
            if self.products.get(product_id).await?.is_none() {
                return Err(CatalogError::ProductNotFound);
            }
        }

        let category = Category {
            id: CategoryId::generate(),
            name,
            products: product_ids,
        };

        self.categories.create(category).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => CatalogError::DuplicateCategoryName,
            other => CatalogError::Repository(other),
        })
    }

    /// Get a category by id, products expanded.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CategoryNotFound` if it does not exist.
    #[instrument(skip(self))]
    pub async fn get_category(&self, id: &CategoryId) -> Result<ExpandedCategory, CatalogError> {
        self.categories
            .get_expanded(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound)
    }

    /// Get a category by name, products expanded.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CategoryNotFound` if it does not exist.
    #[instrument(skip(self))]
    pub async fn get_category_by_name(
        &self,
        name: &str,
    ) -> Result<ExpandedCategory, CatalogError> {
        self.categories
            .get_by_name_expanded(name)
            .await?
            .ok_or(CatalogError::CategoryNotFound)
    }

    /// List all categories, products expanded.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store read fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<ExpandedCategory>, CatalogError> {
        Ok(self.categories.list_expanded().await?)
    }

    /// Append a product to a category's product list.
    ///
    /// Not atomic with product creation; callers sequence the two writes.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if the product does not exist.
    /// Returns `CatalogError::CategoryNotFound` if the category does not exist.
    #[instrument(skip(self))]
    pub async fn attach_product_to_category(
        &self,
        category_id: &CategoryId,
        product_id: ProductId,
    ) -> Result<Category, CatalogError> {
        if self.products.get(&product_id).await?.is_none() {
            return Err(CatalogError::ProductNotFound);
        }

        self.categories
            .append_product(category_id, product_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => CatalogError::CategoryNotFound,
                other => CatalogError::Repository(other),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn new_product(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_owned(),
            quantity: 10,
            price: Price::new(Decimal::new(500, 2)).unwrap(),
            description: "desc".to_owned(),
            image: "img.png".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_product() {
        let store = MemoryStore::default();
        let catalog = CatalogService::new(&store);

        let created = catalog.create_product(new_product("Mug")).await.unwrap();
        let fetched = catalog.get_product(&created.id).await.unwrap();
        assert_eq!(fetched.name, "Mug");

        let missing = catalog.get_product(&ProductId::generate()).await;
        assert!(matches!(missing, Err(CatalogError::ProductNotFound)));
    }

    #[tokio::test]
    async fn test_duplicate_category_name_conflicts() {
        let store = MemoryStore::default();
        let catalog = CatalogService::new(&store);

        catalog
            .create_category("mugs".to_owned(), Vec::new())
            .await
            .unwrap();
        let duplicate = catalog.create_category("mugs".to_owned(), Vec::new()).await;
        assert!(matches!(
            duplicate,
            Err(CatalogError::DuplicateCategoryName)
        ));
    }

    #[tokio::test]
    async fn test_category_rejects_unknown_product() {
        let store = MemoryStore::default();
        let catalog = CatalogService::new(&store);

        let result = catalog
            .create_category("mugs".to_owned(), vec![ProductId::generate()])
            .await;
        assert!(matches!(result, Err(CatalogError::ProductNotFound)));
    }

    #[tokio::test]
    async fn test_attach_and_expand() {
        let store = MemoryStore::default();
        let catalog = CatalogService::new(&store);

        let category = catalog
            .create_category("mugs".to_owned(), Vec::new())
            .await
            .unwrap();
        let product = catalog.create_product(new_product("Mug")).await.unwrap();

        catalog
            .attach_product_to_category(&category.id, product.id.clone())
            .await
            .unwrap();
        // Re-attaching is a no-op.
        catalog
            .attach_product_to_category(&category.id, product.id.clone())
            .await
            .unwrap();

        let expanded = catalog.get_category(&category.id).await.unwrap();
        assert_eq!(expanded.products.len(), 1);
        assert_eq!(expanded.products[0].id, product.id);

        let by_name = catalog.get_category_by_name("mugs").await.unwrap();
        assert_eq!(by_name.id, category.id);
    }
}
