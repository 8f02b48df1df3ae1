//! User repository.

use copperleaf_core::{Email, UserId};

use super::{MemoryStore, RepositoryError};
use crate::models::User;

/// Repository for user records.
pub struct UserRepository<'a> {
    store: &'a MemoryStore,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a MemoryStore) -> Self {
        Self { store }
    }

    /// Get a user by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the operation deadline elapses.
    pub async fn get_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        self.store
            .guarded(async {
                let users = self.store.users.read().await;
                users.by_id.get(id).cloned()
            })
            .await
    }

    /// Get a user by email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the operation deadline elapses.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        self.store
            .guarded(async {
                let users = self.store.users.read().await;
                users
                    .email_index
                    .get(email.as_str())
                    .and_then(|id| users.by_id.get(id))
                    .cloned()
            })
            .await
    }

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    /// Returns `RepositoryError::Unavailable` if the operation deadline elapses.
    pub async fn create(&self, user: User) -> Result<User, RepositoryError> {
        self.store
            .guarded(async {
                let mut users = self.store.users.write().await;

                if users.email_index.contains_key(user.email.as_str()) {
                    return Err(RepositoryError::Conflict(
                        "email already registered".to_owned(),
                    ));
                }

                users
                    .email_index
                    .insert(user.email.as_str().to_owned(), user.id.clone());
                users.by_id.insert(user.id.clone(), user.clone());
                Ok(user)
            })
            .await?
    }
}
