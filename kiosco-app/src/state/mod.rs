//! Client-side application state.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod session;
pub mod stats;
