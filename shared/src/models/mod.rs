//! Domain models

mod product;
mod sale;
mod user;

pub use product::{Product, ProductCreate, ProductUpdate};
pub use sale::{Sale, SaleCreate, SaleItem};
pub use user::{RegisterRequest, User, UserUpdate};
