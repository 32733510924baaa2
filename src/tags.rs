//! Tags
//!
//! Benefit keywords attached to products and selected in the listing sidebar.

pub mod collection;
pub mod string;
