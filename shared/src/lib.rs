//! Shared types for the kiosco storefront
//!
//! Domain models, wire envelopes and small utilities used by both the
//! HTTP client crate and the terminal application.

pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
