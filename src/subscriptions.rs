//! Subscriptions
//!
//! Read-only change listeners for the cart store and the listing.

use std::fmt;

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Subscription Key
    pub struct SubscriptionKey;
}

type Listener<'a, E> = Box<dyn FnMut(&E) + 'a>;

/// A set of listeners notified, in subscription order, with a shared reference to the new state.
pub struct Subscribers<'a, E: ?Sized> {
    listeners: SlotMap<SubscriptionKey, Listener<'a, E>>,
    order: Vec<SubscriptionKey>,
}

impl<'a, E: ?Sized> Subscribers<'a, E> {
    /// Create an empty set of listeners.
    pub fn new() -> Self {
        Self {
            listeners: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Register a listener, returning the key needed to remove it.
    pub fn subscribe(&mut self, listener: impl FnMut(&E) + 'a) -> SubscriptionKey {
        let key = self.listeners.insert(Box::new(listener));

        self.order.push(key);

        key
    }

    /// Remove a listener. Returns `false` if the key was unknown.
    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        if self.listeners.remove(key).is_none() {
            return false;
        }

        self.order.retain(|&existing| existing != key);

        true
    }

    /// Call every listener with the new state.
    pub fn notify(&mut self, state: &E) {
        // Freed slots are reused, so slot order is not subscription order.
        for &key in &self.order {
            if let Some(listener) = self.listeners.get_mut(key) {
                listener(state);
            }
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<E: ?Sized> Default for Subscribers<'_, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ?Sized> fmt::Debug for Subscribers<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
