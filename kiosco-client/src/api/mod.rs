//! Per-entity API methods
//!
//! Each submodule extends [`HttpClient`](crate::HttpClient) with the
//! routes for one backend entity.

pub mod auth;
pub mod products;
pub mod sales;
pub mod users;
