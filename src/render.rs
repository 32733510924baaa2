//! Rendering
//!
//! Terminal tables for listings and carts.

use std::io;

use tabled::{
    Table,
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartItem},
    catalog::Catalog,
    pricing::{self, PricingError},
    products::Product,
    tags::collection::TagCollection,
};

/// Errors that can occur when rendering a table.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Error writing to the output
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Error calculating a total
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// A cart line refers to a product missing from the catalog
    #[error("Missing product: {0}")]
    MissingProduct(String),
}

/// Write the visible products as a table.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_listing<T: TagCollection>(
    mut out: impl io::Write,
    products: &[&Product<'_, T>],
) -> Result<(), RenderError> {
    if products.is_empty() {
        writeln!(out, "No products match the current filters.")?;

        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record([
        "ID", "Product", "Category", "Tags", "Price", "Sale", "Rating", "Badges",
    ]);

    for product in products {
        let sale = match (product.discount_price, pricing::savings_label(product)) {
            (Some(discount), Some(label)) => format!("{discount} ({label})"),
            (Some(discount), None) => discount.to_string(),
            (None, _) => String::new(),
        };

        builder.push_record([
            product.id.clone(),
            product.name.clone(),
            product.category.to_string(),
            product.tags.iter().collect::<Vec<_>>().join(", "),
            product.price.to_string(),
            sale,
            format!("{:.1} ({})", product.rating, product.review_count),
            badges(product),
        ]);
    }

    let mut table = builder.build();

    style(&mut table);
    table.modify(Columns::new(4..7), Alignment::right());

    writeln!(out, "{table}")?;
    writeln!(out, "{} product(s)", products.len())?;

    Ok(())
}

/// Write the cart's lines, item count and subtotal.
///
/// # Errors
///
/// Returns an error if a line's product is missing from the catalog, a total overflows, or the
/// output cannot be written.
pub fn write_cart<T: TagCollection>(
    mut out: impl io::Write,
    cart: &Cart<'_>,
    catalog: &Catalog<'_, T>,
) -> Result<(), RenderError> {
    if cart.is_empty() {
        writeln!(out, "Your cart is empty.")?;

        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["", "Product", "Qty", "Unit Price", "Line Total"]);

    for (idx, item) in cart.items().enumerate() {
        builder.push_record(cart_row(idx, item, catalog)?);
    }

    let mut table = builder.build();

    style(&mut table);
    table.modify(Columns::new(2..5), Alignment::right());

    writeln!(out, "{table}")?;
    writeln!(out, " Items:    {}", cart.total_items())?;
    writeln!(out, " Subtotal: {}", cart.subtotal()?)?;

    Ok(())
}

fn cart_row<T: TagCollection>(
    idx: usize,
    item: &CartItem<'_>,
    catalog: &Catalog<'_, T>,
) -> Result<[String; 5], RenderError> {
    let product = catalog
        .get(item.product_id())
        .ok_or_else(|| RenderError::MissingProduct(item.product_id().to_string()))?;

    Ok([
        format!("#{:<3}", idx + 1),
        product.name.clone(),
        item.quantity().to_string(),
        item.unit_price().to_string(),
        item.line_total()?.to_string(),
    ])
}

fn badges<T: TagCollection>(product: &Product<'_, T>) -> String {
    [
        (product.featured, "featured"),
        (product.best_seller, "best seller"),
        (product.new, "new"),
        (!product.in_stock(), "sold out"),
    ]
    .into_iter()
    .filter_map(|(on, badge)| on.then_some(badge))
    .collect::<Vec<_>>()
    .join(", ")
}

fn style(table: &mut Table) {
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
}
