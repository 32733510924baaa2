//! Cart Snapshots
//!
//! The persisted form of a cart:
//!
//! ```json
//! { "items": [{ "productId": "p1", "quantity": 2, "unitPriceSnapshot": "8.00" }] }
//! ```

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    cart::{Cart, CartItem},
    pricing,
};

/// Serialized cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Lines in cart order
    pub items: Vec<SnapshotItem>,
}

/// Serialized cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotItem {
    /// Product identifier
    pub product_id: String,

    /// Number of units
    pub quantity: u32,

    /// Unit price in major units
    pub unit_price_snapshot: Decimal,
}

impl From<&CartItem<'_>> for SnapshotItem {
    fn from(item: &CartItem<'_>) -> Self {
        Self {
            product_id: item.product_id.clone(),
            quantity: item.quantity,
            unit_price_snapshot: pricing::to_decimal(&item.unit_price),
        }
    }
}

impl From<&Cart<'_>> for CartSnapshot {
    fn from(cart: &Cart<'_>) -> Self {
        Self {
            items: cart.items().map(SnapshotItem::from).collect(),
        }
    }
}

impl CartSnapshot {
    /// Parse a snapshot from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if the text is not a valid snapshot.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Encode the snapshot as JSON.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if encoding fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Rebuild a cart, keeping only lines that still make sense.
    ///
    /// Lines are dropped when the quantity is zero, the unit price is not positive or cannot be
    /// represented, or `is_known` rejects the product. Repeated products are merged. Returns the
    /// cart and the number of dropped lines.
    pub fn into_cart<'a>(
        self,
        currency: &'a Currency,
        is_known: impl Fn(&str) -> bool,
    ) -> (Cart<'a>, usize) {
        let mut cart = Cart::new(currency);
        let mut dropped = 0;

        for item in self.items {
            if item.quantity == 0 || !is_known(&item.product_id) {
                warn!(product_id = %item.product_id, quantity = item.quantity, "dropping stale cart line");
                dropped += 1;
                continue;
            }

            let unit_price = match pricing::from_decimal(item.unit_price_snapshot, currency) {
                Ok(price) if price.to_minor_units() > 0 => price,
                Ok(_) | Err(_) => {
                    warn!(
                        product_id = %item.product_id,
                        unit_price = %item.unit_price_snapshot,
                        "dropping cart line with invalid price"
                    );
                    dropped += 1;
                    continue;
                }
            };

            if let Err(source) = cart.add(&item.product_id, item.quantity, unit_price) {
                warn!(product_id = %item.product_id, "dropping cart line: {source}");
                dropped += 1;
            }
        }

        (cart, dropped)
    }
}
