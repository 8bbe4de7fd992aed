//! Kiosco Client - HTTP client for the kiosco backend
//!
//! Provides network calls to the backend REST API: authentication,
//! product catalog, user records and sales. Responses go through the
//! normalization adapter so callers only ever see the shapes in `shared`.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;

// Re-export shared types for convenience
pub use api::auth::LoginResponse;
pub use shared::models::{Product, ProductCreate, ProductUpdate, RegisterRequest, Sale, SaleCreate, User, UserUpdate};
