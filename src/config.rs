//! Configuration
//!
//! Command line and environment settings for the `storefront` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    catalog::Catalog,
    filters::{FilterCriteria, FilterError, PriceRange, SortOption},
    pricing::{self, PricingError},
    products::Category,
    tags::collection::TagCollection,
};

/// Errors turning command line arguments into engine inputs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filter arguments do not form valid criteria
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// A price argument cannot be represented in the catalog currency
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Storefront configuration
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront catalog and cart", long_about = None)]
pub struct StorefrontConfig {
    /// Catalog fixture file
    #[arg(long, env = "STOREFRONT_CATALOG", default_value = "fixtures/catalog/wellness.yml")]
    pub catalog: PathBuf,

    /// Directory the cart is stored in
    #[arg(long, env = "STOREFRONT_STORAGE_DIR", default_value = ".storefront")]
    pub storage_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "STOREFRONT_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

impl StorefrontConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human readable single-line events
    #[default]
    Compact,

    /// Newline delimited JSON events
    Json,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List catalog products
    List(ListArgs),

    /// Inspect or change the cart
    Cart(CartCommand),

    /// Submit the cart and clear it
    Checkout,
}

/// Listing filters
#[derive(Debug, Default, Args)]
pub struct ListArgs {
    /// Case-insensitive text matched against name, description and tags
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only show this category (repeatable)
    #[arg(short, long = "category")]
    pub categories: Vec<Category>,

    /// Only show products with this tag (repeatable)
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Lowest effective price, in major units
    #[arg(long)]
    pub min_price: Option<Decimal>,

    /// Highest effective price, in major units
    #[arg(long)]
    pub max_price: Option<Decimal>,

    /// Sort order (featured, price-low, price-high, newest, best-selling)
    #[arg(long, env = "STOREFRONT_SORT", default_value_t = SortOption::Featured)]
    pub sort: SortOption,
}

impl ListArgs {
    /// Build filter criteria for `catalog`.
    ///
    /// A missing price bound is taken from the catalog's own price bounds, widened so a single
    /// bound outside the catalog's prices selects nothing rather than failing.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a price cannot be represented or the minimum is above the
    /// maximum.
    pub fn criteria<'a, T: TagCollection>(
        &self,
        catalog: &Catalog<'a, T>,
    ) -> Result<FilterCriteria<'a, T>, ConfigError> {
        let mut criteria = FilterCriteria::default().with_sort(self.sort);

        if let Some(search) = &self.search {
            criteria = criteria.with_search(search.clone());
        }

        for &category in &self.categories {
            criteria = criteria.with_category(category);
        }

        for tag in &self.tags {
            criteria = criteria.with_tag(tag);
        }

        if let Some(range) = self.price_range(catalog)? {
            criteria = criteria.with_price_range(range);
        }

        Ok(criteria)
    }

    fn price_range<'a, T: TagCollection>(
        &self,
        catalog: &Catalog<'a, T>,
    ) -> Result<Option<PriceRange<'a>>, ConfigError> {
        let Some(bounds) = catalog.price_bounds() else {
            return Ok(None);
        };

        let currency = catalog.currency();

        let min = self
            .min_price
            .map(|value| pricing::from_decimal(value, currency))
            .transpose()?;

        let max = self
            .max_price
            .map(|value| pricing::from_decimal(value, currency))
            .transpose()?;

        // A lone bound outside the catalog prices must not invert the range.
        let (min, max) = match (min, max) {
            (Some(min), Some(max)) => (min, max),
            (Some(min), None) => (min, later_of(min, bounds.max())),
            (None, Some(max)) => (earlier_of(max, bounds.min()), max),
            (None, None) => return Ok(None),
        };

        Ok(Some(PriceRange::new(min, max)?))
    }
}

fn earlier_of<'a>(a: Money<'a, Currency>, b: Money<'a, Currency>) -> Money<'a, Currency> {
    if b.to_minor_units() < a.to_minor_units() { b } else { a }
}

fn later_of<'a>(a: Money<'a, Currency>, b: Money<'a, Currency>) -> Money<'a, Currency> {
    if b.to_minor_units() > a.to_minor_units() { b } else { a }
}

/// Cart command
#[derive(Debug, Args)]
pub struct CartCommand {
    /// Cart operation
    #[command(subcommand)]
    pub command: CartSubcommand,
}

/// Cart operations
#[derive(Debug, Subcommand)]
pub enum CartSubcommand {
    /// Show the cart
    Show,

    /// Add units of a product
    Add {
        /// Product identifier
        product_id: String,

        /// Number of units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },

    /// Set the quantity of a product, 0 removes it
    Update {
        /// Product identifier
        product_id: String,

        /// New quantity
        quantity: u32,
    },

    /// Remove a product
    Remove {
        /// Product identifier
        product_id: String,
    },

    /// Remove every product
    Clear,
}
