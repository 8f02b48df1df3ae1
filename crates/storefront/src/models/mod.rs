//! Domain models persisted in the document store.

pub mod cart;
pub mod category;
pub mod product;
pub mod user;

pub use cart::{Cart, CartItem, ExpandedCart, ExpandedCartItem};
pub use category::{Category, ExpandedCategory};
pub use product::Product;
pub use user::User;
