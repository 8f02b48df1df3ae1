//! Business logic services.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod email;

pub use auth::{AuthError, AuthService, Claims, TokenKeys};
pub use cart::{CartError, CartService};
pub use catalog::{CatalogError, CatalogService, NewProduct};
pub use email::{EmailService, OrderSummary};
