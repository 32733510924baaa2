//! Pricing
//!
//! Money helpers shared by the cart, the snapshot format and the renderers. All arithmetic happens
//! in minor units with overflow checks.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{products::Product, tags::collection::TagCollection};

/// Number of decimal places in the minor unit of every supported currency.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Errors that can occur during price arithmetic.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The result does not fit in minor units.
    #[error("price arithmetic overflowed")]
    Overflow,

    /// Two amounts in different currencies were combined (left, right).
    #[error("cannot combine {0} with {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// A decimal amount cannot be represented in minor units.
    #[error("invalid amount: {0}")]
    InvalidAmount(Decimal),
}

/// Price of `quantity` units at `unit_price`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the total does not fit in minor units.
pub fn line_total<'a>(
    unit_price: Money<'a, Currency>,
    quantity: u32,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor = unit_price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, unit_price.currency()))
}

/// Sum amounts in a single currency, starting from zero.
///
/// # Errors
///
/// Returns a [`PricingError`] on overflow or if an amount is in another currency.
pub fn sum<'a>(
    currency: &'a Currency,
    amounts: impl IntoIterator<Item = Money<'a, Currency>>,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor = amounts.into_iter().try_fold(0_i64, |acc, amount| {
        if amount.currency() != currency {
            return Err(PricingError::CurrencyMismatch(
                currency.iso_alpha_code,
                amount.currency().iso_alpha_code,
            ));
        }

        acc.checked_add(amount.to_minor_units())
            .ok_or(PricingError::Overflow)
    })?;

    Ok(Money::from_minor(minor, currency))
}

/// Convert an amount to a decimal in major units (e.g. `8.00`).
pub fn to_decimal(amount: &Money<'_, Currency>) -> Decimal {
    Decimal::new(amount.to_minor_units(), MINOR_UNIT_SCALE)
}

/// Convert a decimal in major units to an amount, rounding to the nearest minor unit.
///
/// # Errors
///
/// Returns [`PricingError::InvalidAmount`] if the value does not fit in minor units.
pub fn from_decimal(value: Decimal, currency: &Currency) -> Result<Money<'_, Currency>, PricingError> {
    let minor = value
        .checked_mul(Decimal::from(10_i64.pow(MINOR_UNIT_SCALE)))
        .and_then(|scaled| scaled.round_dp(0).to_i64())
        .ok_or(PricingError::InvalidAmount(value))?;

    Ok(Money::from_minor(minor, currency))
}

/// Amount saved by buying at the discount price, if the product is discounted.
pub fn savings<'a, T: TagCollection>(product: &Product<'a, T>) -> Option<Money<'a, Currency>> {
    let discount = product.discount_price?;
    let saved = product
        .price
        .to_minor_units()
        .checked_sub(discount.to_minor_units())?;

    Some(Money::from_minor(saved, product.price.currency()))
}

/// Savings as a fraction of the base price, if the product is discounted.
pub fn savings_percent<T: TagCollection>(product: &Product<'_, T>) -> Option<Percentage> {
    savings_ratio(product).map(Percentage::from)
}

/// Savings label for badges, e.g. `-20%`.
pub fn savings_label<T: TagCollection>(product: &Product<'_, T>) -> Option<String> {
    let percent = savings_ratio(product)?
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp(0);

    Some(format!("-{percent}%"))
}

fn savings_ratio<T: TagCollection>(product: &Product<'_, T>) -> Option<Decimal> {
    let saved = to_decimal(&savings(product)?);
    let base = to_decimal(&product.price);

    saved.checked_div(base)
}
