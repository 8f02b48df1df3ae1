//! User account model.

use serde::Serialize;

use copperleaf_core::{Email, UserId, UserRole};

/// A registered user.
///
/// The password hash never leaves the process: it is skipped during
/// serialization so it cannot leak into a response body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Unique across all users.
    pub email: Email,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
}
