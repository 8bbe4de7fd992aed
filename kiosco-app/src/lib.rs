//! Kiosco terminal application
//!
//! Storefront and admin console over the kiosco backend REST API. State
//! lives in `state`, durable key/value storage in `storage`, screens in
//! `ui`.

pub mod config;
pub mod notify;
pub mod state;
pub mod storage;
pub mod ui;
