//! Cart invariants over arbitrary operation sequences.

use proptest::{prelude::*, test_runner::TestCaseError};
use rusty_money::{Money, iso::USD};
use storefront::prelude::*;

const IDS: [&str; 5] = ["a", "b", "c", "d", "missing"];

#[derive(Clone, Debug)]
enum Op {
    Add(usize, u32),
    Update(usize, u32),
    Remove(usize),
    Clear,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..IDS.len(), 0..6_u32).prop_map(|(idx, qty)| Op::Add(idx, qty)),
        2 => (0..IDS.len(), 0..6_u32).prop_map(|(idx, qty)| Op::Update(idx, qty)),
        2 => (0..IDS.len()).prop_map(Op::Remove),
        1 => Just(Op::Clear),
    ]
}

fn catalog<'a>() -> Result<Catalog<'a>, TestCaseError> {
    Catalog::new(
        [
            Product::new("a", "A", Category::Health, Money::from_minor(10_00, USD))
                .with_discount_price(Money::from_minor(8_00, USD)),
            Product::new("b", "B", Category::Beauty, Money::from_minor(3_33, USD)),
            Product::new("c", "C", Category::Sport, Money::from_minor(125_99, USD)),
            Product::new("d", "D", Category::Pet, Money::from_minor(1, USD)),
        ],
        USD,
    )
    .map_err(|err| TestCaseError::fail(err.to_string()))
}

fn id(idx: usize) -> &'static str {
    IDS.get(idx).copied().unwrap_or("missing")
}

fn apply(store: &mut CartStore<'_, MemoryStorage>, op: &Op) {
    match *op {
        Op::Add(idx, qty) => {
            let before = store.cart().clone();

            if store.add_item(id(idx), qty).is_err() {
                assert_eq!(store.cart(), &before, "rejected add changed the cart");
            }
        }
        Op::Update(idx, qty) => store.update_quantity(id(idx), qty),
        Op::Remove(idx) => store.remove_item(id(idx)),
        Op::Clear => store.clear(),
    }
}

proptest! {
    #[test]
    fn every_line_has_positive_quantity(ops in prop::collection::vec(arb_op(), 0..40)) {
        let catalog = catalog()?;
        let mut store = CartStore::new(&catalog, MemoryStorage::new());

        for op in &ops {
            apply(&mut store, op);

            prop_assert!(store.cart().items().all(|item| item.quantity() >= 1));
            prop_assert!(!store.cart().contains("missing"));
        }
    }

    #[test]
    fn totals_match_lines(ops in prop::collection::vec(arb_op(), 0..40)) {
        let catalog = catalog()?;
        let mut store = CartStore::new(&catalog, MemoryStorage::new());

        for op in &ops {
            apply(&mut store, op);
        }

        let expected_items: u64 = store.cart().items().map(|item| u64::from(item.quantity())).sum();
        let expected_minor: i64 = store
            .cart()
            .items()
            .map(|item| item.unit_price().to_minor_units() * i64::from(item.quantity()))
            .sum();

        prop_assert_eq!(store.total_items(), expected_items);
        prop_assert_eq!(
            store.subtotal().map(|subtotal| subtotal.to_minor_units()),
            Ok(expected_minor)
        );
    }

    #[test]
    fn removal_is_idempotent(ops in prop::collection::vec(arb_op(), 0..20), idx in 0..IDS.len()) {
        let catalog = catalog()?;
        let mut store = CartStore::new(&catalog, MemoryStorage::new());

        for op in &ops {
            apply(&mut store, op);
        }

        store.remove_item(id(idx));
        let once = store.cart().clone();

        store.remove_item(id(idx));

        prop_assert_eq!(store.cart(), &once);
    }

    #[test]
    fn persisted_snapshot_restores_same_cart(ops in prop::collection::vec(arb_op(), 1..30)) {
        let catalog = catalog()?;
        let mut store = CartStore::new(&catalog, MemoryStorage::new());

        for op in &ops {
            apply(&mut store, op);
        }

        let expected = store.cart().clone();
        let restored = CartStore::hydrate(&catalog, store.into_storage());

        prop_assert_eq!(restored.cart(), &expected);
    }
}
