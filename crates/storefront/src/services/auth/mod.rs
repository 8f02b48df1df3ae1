//! Authentication service.
//!
//! Registration, login, and current-user resolution. Password hashing is
//! Argon2id; session tokens are signed JWTs (see [`token`]).

mod error;
mod token;

pub use error::AuthError;
pub use token::{Claims, TokenKeys};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::instrument;

use copperleaf_core::{Email, UserId, UserRole};

use crate::db::{MemoryStore, RepositoryError, UserRepository};
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    keys: &'a TokenKeys,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a MemoryStore, keys: &'a TokenKeys) -> Self {
        Self {
            users: UserRepository::new(store),
            keys,
        }
    }

    /// Register a new user and issue a session token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<(User, String), AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = User {
            id: UserId::generate(),
            name: name.to_owned(),
            email,
            password_hash,
            role,
        };

        let user = self.users.create(user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
            other => AuthError::Repository(other),
        })?;

        let token = self.keys.issue(&user)?;
        Ok((user, token))
    }

    /// Login with email and password, issuing a session token.
    ///
    /// Unknown email and wrong password produce the same error so the
    /// endpoint is not an account oracle.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let email = Email::parse(email)?;

        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        self.keys.issue(&user)
    }

    /// Resolve the user behind verified token claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the subject is not a valid id.
    /// Returns `AuthError::UserNotFound` if the account no longer exists.
    #[instrument(skip(self, claims))]
    pub async fn current_user(&self, claims: &Claims) -> Result<User, AuthError> {
        let user_id = UserId::parse(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        self.users
            .get_by_id(&user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn keys() -> TokenKeys {
        TokenKeys::new(&SecretString::from(
            "an-integration-test-secret-of-sufficient-length",
        ))
    }

    #[tokio::test]
    async fn test_register_login_current_user_flow() {
        let store = MemoryStore::default();
        let keys = keys();
        let auth = AuthService::new(&store, &keys);

        let (user, token) = auth
            .register("Ada", "ada@example.com", "correct horse", UserRole::Customer)
            .await
            .unwrap();
        assert_eq!(user.name, "Ada");

        let login_token = auth.login("ada@example.com", "correct horse").await.unwrap();
        let claims = keys.verify(&login_token).unwrap();
        let current = auth.current_user(&claims).await.unwrap();
        assert_eq!(current.id, user.id);

        // The registration token also verifies.
        assert!(keys.verify(&token).is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::default();
        let keys = keys();
        let auth = AuthService::new(&store, &keys);

        auth.register("Ada", "ada@example.com", "correct horse", UserRole::Customer)
            .await
            .unwrap();
        let duplicate = auth
            .register("Eve", "ada@example.com", "other password", UserRole::Customer)
            .await;
        assert!(matches!(duplicate, Err(AuthError::UserAlreadyExists)));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let store = MemoryStore::default();
        let keys = keys();
        let auth = AuthService::new(&store, &keys);

        auth.register("Ada", "ada@example.com", "correct horse", UserRole::Customer)
            .await
            .unwrap();

        let wrong_password = auth.login("ada@example.com", "wrong password").await;
        let unknown_email = auth.login("nobody@example.com", "correct horse").await;
        assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_weak_password_rejected() {
        let store = MemoryStore::default();
        let keys = keys();
        let auth = AuthService::new(&store, &keys);

        let result = auth
            .register("Ada", "ada@example.com", "short", UserRole::Customer)
            .await;
        assert!(matches!(result, Err(AuthError::WeakPassword(_))));
    }
}
