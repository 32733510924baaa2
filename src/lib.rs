//! Storefront
//!
//! Client-side catalog filtering and cart state for a wellness storefront.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod filters;
pub mod fixtures;
pub mod listing;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod render;
pub mod subscriptions;
pub mod tags;
