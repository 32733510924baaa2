//! Cart Store
//!
//! The single writer of the session's cart. Every successful operation persists a snapshot and
//! notifies subscribers. Persistence is best effort: a failed write is logged and the in-memory
//! cart stays authoritative.

use rusty_money::{Money, iso::Currency};
use tracing::{Span, debug, info, warn};

use crate::{
    cart::{
        Cart, CartError,
        checkout::{CheckoutError, CheckoutGateway, CheckoutOrder},
        snapshot::CartSnapshot,
        storage::CartStorage,
    },
    catalog::Catalog,
    pricing::PricingError,
    subscriptions::{SubscriptionKey, Subscribers},
    tags::{collection::TagCollection, string::StringTagCollection},
};

/// Storage key the cart snapshot lives under.
pub const CART_STORAGE_KEY: &str = "cart";

/// Cart Store
#[derive(Debug)]
pub struct CartStore<'a, S: CartStorage, T: TagCollection = StringTagCollection> {
    catalog: &'a Catalog<'a, T>,
    cart: Cart<'a>,
    storage: S,
    subscribers: Subscribers<'a, Cart<'a>>,
    persistence_failures: usize,
}

impl<'a, S: CartStorage, T: TagCollection> CartStore<'a, S, T> {
    /// Create a store with an empty cart, ignoring anything already in storage.
    pub fn new(catalog: &'a Catalog<'a, T>, storage: S) -> Self {
        Self {
            catalog,
            cart: Cart::new(catalog.currency()),
            storage,
            subscribers: Subscribers::new(),
            persistence_failures: 0,
        }
    }

    /// Create a store from the snapshot in storage.
    ///
    /// Falls back to an empty cart if no snapshot exists or it cannot be read or parsed. Lines for
    /// products missing from the catalog are dropped.
    pub fn hydrate(catalog: &'a Catalog<'a, T>, storage: S) -> Self {
        let mut store = Self::new(catalog, storage);

        let raw = match store.storage.read(CART_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("no stored cart, starting empty");
                return store;
            }
            Err(source) => {
                warn!("failed to read stored cart, starting empty: {source}");
                return store;
            }
        };

        let snapshot = match CartSnapshot::from_json(&raw) {
            Ok(snapshot) => snapshot,
            Err(source) => {
                warn!("stored cart is not a valid snapshot, starting empty: {source}");
                return store;
            }
        };

        let (cart, dropped) = snapshot.into_cart(catalog.currency(), |id| catalog.get(id).is_some());

        debug!(lines = cart.len(), dropped, "hydrated cart");

        store.cart = cart;
        store
    }

    /// Current cart.
    pub fn cart(&self) -> &Cart<'a> {
        &self.cart
    }

    /// Catalog used to resolve products.
    pub fn catalog(&self) -> &'a Catalog<'a, T> {
        self.catalog
    }

    /// Backing storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store, returning its storage.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Number of snapshot writes that failed since the store was created.
    pub fn persistence_failures(&self) -> usize {
        self.persistence_failures
    }

    /// Sum of all quantities.
    pub fn total_items(&self) -> u64 {
        self.cart.total_items()
    }

    /// Sum of all line totals.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the total does not fit in minor units.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, PricingError> {
        self.cart.subtotal()
    }

    /// Register a listener called with the cart after every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&Cart<'a>) + 'a) -> SubscriptionKey {
        self.subscribers.subscribe(listener)
    }

    /// Remove a listener. Returns `false` if the key was unknown.
    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        self.subscribers.unsubscribe(key)
    }

    /// Add units of a product.
    ///
    /// A product already in the cart has its quantity increased and keeps the unit price it was
    /// first added at. A new line captures the product's current effective price.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: `quantity` is zero.
    /// - [`CartError::UnknownProduct`]: the product is not in the catalog.
    /// - [`CartError::QuantityOverflow`]: the line quantity would overflow.
    ///
    /// The cart is unchanged when an error is returned.
    #[tracing::instrument(skip(self), fields(line_quantity = tracing::field::Empty))]
    pub fn add_item(&mut self, product_id: &str, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        let product = self
            .catalog
            .get(product_id)
            .ok_or_else(|| CartError::UnknownProduct(product_id.to_string()))?;

        let line_quantity = self
            .cart
            .add(product_id, quantity, product.effective_price())?;

        Span::current().record("line_quantity", line_quantity);

        self.commit();

        Ok(())
    }

    /// Set the quantity of a product in the cart.
    ///
    /// A quantity of zero removes the line. Products not in the cart are ignored.
    #[tracing::instrument(skip(self))]
    pub fn update_quantity(&mut self, product_id: &str, quantity: u32) {
        if quantity == 0 {
            self.remove_item(product_id);
            return;
        }

        if self.cart.set_quantity(product_id, quantity).is_none() {
            debug!("product not in cart");
        }

        self.commit();
    }

    /// Remove a product from the cart. Products not in the cart are ignored.
    #[tracing::instrument(skip(self))]
    pub fn remove_item(&mut self, product_id: &str) {
        if self.cart.remove(product_id).is_none() {
            debug!("product not in cart");
        }

        self.commit();
    }

    /// Remove every line.
    #[tracing::instrument(skip(self))]
    pub fn clear(&mut self) {
        self.cart.clear();
        self.commit();
    }

    /// Submit the cart to a checkout gateway, clearing it once the gateway accepts.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the cart is empty, its totals overflow, or the gateway
    /// declines. The cart is unchanged when an error is returned.
    #[tracing::instrument(skip(self, gateway), fields(total_items = self.cart.total_items()))]
    pub fn checkout<G: CheckoutGateway>(
        &mut self,
        gateway: &mut G,
    ) -> Result<G::Confirmation, CheckoutError> {
        let order = CheckoutOrder::from_cart(&self.cart)?;
        let confirmation = gateway.submit(&order)?;

        info!(subtotal = %order.subtotal, "checkout accepted");

        self.clear();

        Ok(confirmation)
    }

    fn commit(&mut self) {
        if let Err(source) = self.persist() {
            self.persistence_failures += 1;
            warn!(failures = self.persistence_failures, "{source}");
        }

        self.subscribers.notify(&self.cart);
    }

    fn persist(&mut self) -> Result<(), CartError> {
        let json = CartSnapshot::from(&self.cart).to_json()?;

        self.storage
            .write(CART_STORAGE_KEY, &json)
            .map_err(CartError::PersistenceWriteFailed)
    }
}
