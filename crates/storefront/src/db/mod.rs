//! Document store adapter.
//!
//! # Collections
//!
//! - `users` - Registered accounts, unique by email
//! - `products` - Catalog products
//! - `categories` - Product groupings, unique by name
//! - `carts` - One cart per user, keyed by `UserId`
//!
//! The store exposes find-one/create/update-by-id semantics plus an explicit
//! expand operation that resolves stored product references to full records
//! at read time. Cart updates go through an optimistic compare-and-swap on
//! the cart's version field.
//!
//! Every operation runs under a bounded timeout; an elapsed deadline maps to
//! [`RepositoryError::Unavailable`] so a stalled store never wedges a request.

pub mod carts;
pub mod categories;
pub mod products;
pub mod users;

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::RwLock;

use copperleaf_core::{CategoryId, ProductId, UserId};

use crate::models::{Cart, Category, Product, User};

pub use carts::CartRepository;
pub use categories::CategoryRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The requested record does not exist.
    #[error("record not found")]
    NotFound,

    /// A compare-and-swap lost to a concurrent writer.
    #[error("version mismatch on concurrent update")]
    VersionMismatch,

    /// The store did not answer within the operation deadline.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored reference points at a record that no longer exists.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Default per-operation deadline.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_millis(2000);

#[derive(Default)]
struct UserCollection {
    by_id: HashMap<UserId, User>,
    email_index: HashMap<String, UserId>,
}

#[derive(Default)]
struct CategoryCollection {
    by_id: HashMap<CategoryId, Category>,
    name_index: HashMap<String, CategoryId>,
}

/// In-memory document store.
///
/// Each collection sits behind its own `RwLock`; secondary unique indexes
/// live inside the same lock as their collection so index and data can never
/// disagree.
pub struct MemoryStore {
    op_timeout: Duration,
    users: RwLock<UserCollection>,
    products: RwLock<HashMap<ProductId, Product>>,
    categories: RwLock<CategoryCollection>,
    carts: RwLock<HashMap<UserId, Cart>>,
}

impl MemoryStore {
    /// Create an empty store with the given per-operation deadline.
    #[must_use]
    pub fn new(op_timeout: Duration) -> Self {
        Self {
            op_timeout,
            users: RwLock::default(),
            products: RwLock::default(),
            categories: RwLock::default(),
            carts: RwLock::default(),
        }
    }

    /// Run a store operation under the configured deadline.
    pub(crate) async fn guarded<T, F>(&self, operation: F) -> Result<T, RepositoryError>
    where
        F: Future<Output = T>,
    {
        tokio::time::timeout(self.op_timeout, operation)
            .await
            .map_err(|_| RepositoryError::Unavailable("store operation timed out".to_owned()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_OP_TIMEOUT)
    }
}
