//! Fixtures
//!
//! YAML catalog files for the CLI and tests.

use std::{fs, path::Path};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError},
    pricing::MINOR_UNIT_SCALE,
    products::{Category, Product},
    tags::string::StringTagCollection,
};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between products
    #[error("Currency mismatch in product {0}: expected {1}, found {2}")]
    CurrencyMismatch(String, String, String),

    /// The fixture has no products, so its currency is unknown
    #[error("Catalog fixture has no products; currency unknown")]
    NoCurrency,

    /// The products do not form a valid catalog
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Catalog file contents
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Products in display order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Unique product identifier
    pub id: String,

    /// Product name
    pub name: String,

    /// Product description
    #[serde(default)]
    pub description: String,

    /// Product category
    pub category: Category,

    /// Benefit keywords
    #[serde(default)]
    pub tags: Vec<String>,

    /// Product price (e.g., "29.99 USD")
    pub price: String,

    /// Discounted price in the same format as `price`
    #[serde(default)]
    pub discount_price: Option<String>,

    /// Average rating
    #[serde(default)]
    pub rating: Decimal,

    /// Number of reviews
    #[serde(default)]
    pub review_count: u32,

    /// Featured flag
    #[serde(default)]
    pub featured: bool,

    /// Best seller flag
    #[serde(default)]
    pub best_seller: bool,

    /// New arrival flag
    #[serde(default)]
    pub new: bool,

    /// Units in stock
    #[serde(default)]
    pub stock: u32,
}

impl TryFrom<ProductFixture> for Product<'_> {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;

        let tags: StringTagCollection = fixture.tags.into_iter().collect();

        let mut product = Product::new(
            fixture.id,
            fixture.name,
            fixture.category,
            Money::from_minor(minor_units, currency),
        )
        .with_description(fixture.description)
        .with_tags(tags)
        .with_reviews(fixture.rating, fixture.review_count)
        .featured(fixture.featured)
        .best_seller(fixture.best_seller)
        .new_arrival(fixture.new)
        .with_stock(fixture.stock);

        if let Some(discount) = fixture.discount_price {
            let (minor_units, currency) = parse_price(&discount)?;

            product = product.with_discount_price(Money::from_minor(minor_units, currency));
        }

        Ok(product)
    }
}

/// Parse price string (e.g., "2.99 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(currency_code), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let minor_units = amount
        .parse::<Decimal>()
        .ok()
        .and_then(|value| value.checked_mul(Decimal::new(10_i64.pow(MINOR_UNIT_SCALE), 0)))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

/// Parse a catalog from YAML text.
///
/// The catalog takes the currency of its first product; every other price must match it.
///
/// # Errors
///
/// Returns a [`FixtureError`] if the YAML is malformed, a price cannot be parsed, currencies are
/// mixed, or the products do not form a valid catalog.
pub fn parse_catalog(contents: &str) -> Result<Catalog<'static>, FixtureError> {
    let fixture: CatalogFixture = serde_norway::from_str(contents)?;

    let currency = fixture
        .products
        .first()
        .map(|product| parse_price(&product.price))
        .transpose()?
        .map(|(_minor_units, currency)| currency)
        .ok_or(FixtureError::NoCurrency)?;

    let mut products = Vec::with_capacity(fixture.products.len());

    for product_fixture in fixture.products {
        let product: Product<'static> = product_fixture.try_into()?;

        for price in std::iter::once(product.price).chain(product.discount_price) {
            if price.currency() != currency {
                return Err(FixtureError::CurrencyMismatch(
                    product.id,
                    currency.iso_alpha_code.to_string(),
                    price.currency().iso_alpha_code.to_string(),
                ));
            }
        }

        products.push(product);
    }

    Ok(Catalog::new(products, currency)?)
}

/// Load a catalog from a YAML fixture file.
///
/// # Errors
///
/// Returns a [`FixtureError`] if the file cannot be read or parsed.
#[tracing::instrument]
pub fn load_catalog(path: &Path) -> Result<Catalog<'static>, FixtureError> {
    let contents = fs::read_to_string(path)?;
    let catalog = parse_catalog(&contents)?;

    tracing::debug!(products = catalog.len(), "loaded catalog");

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::tags::collection::TagCollection;

    use super::*;

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("2.99GBP");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
        assert!(matches!(
            parse_price("2.99 GBP extra"),
            Err(FixtureError::InvalidPrice(_))
        ));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_accepts_usd_and_eur() -> Result<(), FixtureError> {
        let (usd_minor, usd) = parse_price("1.00 USD")?;
        let (eur_minor, eur) = parse_price("2.5 EUR")?;

        assert_eq!(usd_minor, 100);
        assert_eq!(usd, USD);
        assert_eq!(eur_minor, 250);
        assert_eq!(eur, EUR);

        Ok(())
    }

    #[test]
    fn parse_catalog_keeps_file_order_and_fields() -> TestResult {
        let catalog = parse_catalog(
            r"
products:
  - id: omega
    name: Omega 3
    category: health
    tags: [heart, brain]
    price: 10.00 USD
    discount_price: 8.00 USD
    rating: 4.5
    review_count: 12
    featured: true
    stock: 3
  - id: brush
    name: Pet Brush
    category: pet
    price: 6.50 USD
",
        )?;

        let ids: Vec<&str> = catalog.iter().map(|product| product.id.as_str()).collect();
        let omega = catalog.product("omega")?;

        assert_eq!(ids, ["omega", "brush"]);
        assert_eq!(catalog.currency(), USD);
        assert_eq!(omega.effective_price(), Money::from_minor(8_00, USD));
        assert_eq!(omega.rating, Decimal::new(45, 1));
        assert!(omega.featured);
        assert!(omega.tags.contains("brain"));
        assert_eq!(omega.stock, 3);

        Ok(())
    }

    #[test]
    fn parse_catalog_rejects_mixed_currencies() {
        let result = parse_catalog(
            r"
products:
  - id: a
    name: A
    category: sport
    price: 1.00 USD
  - id: b
    name: B
    category: sport
    price: 1.00 GBP
",
        );

        assert!(matches!(result, Err(FixtureError::CurrencyMismatch(id, _, _)) if id == "b"));
    }

    #[test]
    fn parse_catalog_rejects_empty_and_duplicate_products() {
        assert!(matches!(
            parse_catalog("products: []"),
            Err(FixtureError::NoCurrency)
        ));

        let duplicate = parse_catalog(
            r"
products:
  - id: a
    name: A
    category: beauty
    price: 1.00 EUR
  - id: a
    name: A again
    category: beauty
    price: 2.00 EUR
",
        );

        assert!(matches!(
            duplicate,
            Err(FixtureError::Catalog(CatalogError::DuplicateProduct(id))) if id == "a"
        ));
    }

    #[test]
    fn parse_catalog_rejects_unknown_category() {
        let result = parse_catalog(
            r"
products:
  - id: a
    name: A
    category: groceries
    price: 1.00 USD
",
        );

        assert!(matches!(result, Err(FixtureError::Yaml(_))));
    }
}
