//! Checkout
//!
//! The hand-off from the cart to an external checkout flow. Payment and inventory checks belong to
//! the gateway.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    cart::{Cart, CartItem},
    pricing::PricingError,
};

/// Checkout errors
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to submit.
    #[error("cannot check out an empty cart")]
    EmptyCart,

    /// The gateway declined the order.
    #[error("checkout rejected: {0}")]
    Rejected(String),

    /// Wrapped price arithmetic error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// An order line as submitted to checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutLine<'a> {
    /// Product identifier
    pub product_id: String,

    /// Number of units
    pub quantity: u32,

    /// Unit price captured when the product was added
    pub unit_price: Money<'a, Currency>,

    /// `quantity × unit_price`
    pub line_total: Money<'a, Currency>,
}

/// The order handed to the checkout gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutOrder<'a> {
    /// Lines in cart order
    pub lines: Vec<CheckoutLine<'a>>,

    /// Sum of all quantities
    pub total_items: u64,

    /// Sum of all line totals
    pub subtotal: Money<'a, Currency>,
}

impl<'a> CheckoutOrder<'a> {
    /// Build an order from the cart's current contents.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] for an empty cart, or a pricing error if a total
    /// overflows.
    pub fn from_cart(cart: &Cart<'a>) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let lines = cart
            .items()
            .map(CheckoutLine::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            lines,
            total_items: cart.total_items(),
            subtotal: cart.subtotal()?,
        })
    }
}

impl<'a> TryFrom<&CartItem<'a>> for CheckoutLine<'a> {
    type Error = PricingError;

    fn try_from(item: &CartItem<'a>) -> Result<Self, Self::Error> {
        Ok(Self {
            product_id: item.product_id().to_string(),
            quantity: item.quantity(),
            unit_price: item.unit_price(),
            line_total: item.line_total()?,
        })
    }
}

/// External checkout flow.
pub trait CheckoutGateway {
    /// What the gateway returns for an accepted order, e.g. an order reference.
    type Confirmation;

    /// Submit the order.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the order was not accepted.
    fn submit(&mut self, order: &CheckoutOrder<'_>) -> Result<Self::Confirmation, CheckoutError>;
}
