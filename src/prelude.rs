//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        Cart, CartError, CartItem,
        checkout::{CheckoutError, CheckoutGateway, CheckoutLine, CheckoutOrder},
        snapshot::{CartSnapshot, SnapshotItem},
        storage::{CartStorage, FileStorage, MemoryStorage, StorageError},
        store::{CART_STORAGE_KEY, CartStore},
    },
    catalog::{Catalog, CatalogError},
    filters::{FilterCriteria, FilterError, PriceRange, SortOption},
    fixtures::{FixtureError, load_catalog, parse_catalog},
    listing::Listing,
    pricing::PricingError,
    products::{Category, Product, ProductError, ProductKey},
    subscriptions::SubscriptionKey,
    tags::{collection::TagCollection, string::StringTagCollection},
};
