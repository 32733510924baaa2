//! Storefront CLI

use std::io::{self, Write};

use anyhow::Context;
use storefront::{
    cart::{
        checkout::{CheckoutError, CheckoutGateway, CheckoutOrder},
        storage::FileStorage,
        store::CartStore,
    },
    catalog::Catalog,
    config::{CartSubcommand, Command, ListArgs, LogFormat, StorefrontConfig},
    fixtures,
    listing::Listing,
    render,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Gateway that prints the order and accepts it.
struct ConsoleGateway<W> {
    out: W,
}

impl<W: Write> CheckoutGateway for ConsoleGateway<W> {
    type Confirmation = ();

    fn submit(&mut self, order: &CheckoutOrder<'_>) -> Result<(), CheckoutError> {
        let write = |out: &mut W| -> io::Result<()> {
            writeln!(out, "Order submitted:")?;

            for line in &order.lines {
                writeln!(
                    out,
                    "  {} × {} @ {} = {}",
                    line.quantity, line.product_id, line.unit_price, line.line_total
                )?;
            }

            writeln!(out, "  {} item(s), subtotal {}", order.total_items, order.subtotal)
        };

        write(&mut self.out).map_err(|err| CheckoutError::Rejected(err.to_string()))
    }
}

fn main() -> anyhow::Result<()> {
    let config = StorefrontConfig::load().unwrap_or_else(|err| err.exit());

    init_tracing(&config);

    let catalog = fixtures::load_catalog(&config.catalog)
        .with_context(|| format!("failed to load catalog {}", config.catalog.display()))?;

    info!(products = catalog.len(), "catalog loaded");

    let storage = FileStorage::new(&config.storage_dir);
    let mut out = io::stdout().lock();

    match config.command {
        Command::List(args) => list(&mut out, &catalog, &args),
        Command::Cart(command) => {
            let mut store = CartStore::hydrate(&catalog, storage);

            cart(&mut out, &mut store, &command.command)
        }
        Command::Checkout => {
            let mut store = CartStore::hydrate(&catalog, storage);

            store.checkout(&mut ConsoleGateway { out: &mut out })?;

            Ok(())
        }
    }
}

fn init_tracing(config: &StorefrontConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    match config.log_format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn list(out: &mut impl Write, catalog: &Catalog<'_>, args: &ListArgs) -> anyhow::Result<()> {
    let criteria = args.criteria(catalog)?;
    let listing = Listing::with_criteria(catalog, criteria);

    render::write_listing(out, listing.products())?;

    Ok(())
}

fn cart(
    out: &mut impl Write,
    store: &mut CartStore<'_, FileStorage>,
    command: &CartSubcommand,
) -> anyhow::Result<()> {
    match command {
        CartSubcommand::Show => {}
        CartSubcommand::Add {
            product_id,
            quantity,
        } => store.add_item(product_id, *quantity)?,
        CartSubcommand::Update {
            product_id,
            quantity,
        } => store.update_quantity(product_id, *quantity),
        CartSubcommand::Remove { product_id } => store.remove_item(product_id),
        CartSubcommand::Clear => store.clear(),
    }

    render::write_cart(out, store.cart(), store.catalog())?;

    Ok(())
}
