//! End-to-end seeding through the engine and the store.

use orderseed_core::{
    address::{AddressError, AddressProvider, DisabledProvider},
    engine::{InsertPlan, SeedEngine},
    error::SeedError,
    rng::StreamRng,
    store::RECENT_ACTIVITY_LIMIT,
};
use std::collections::HashSet;

/// Returns a fixed string per country.
struct StubProvider;

impl AddressProvider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn resolve(&mut self, country: &str, _rng: &mut StreamRng) -> Result<String, AddressError> {
        Ok(format!("1 Stub Street, Stubville, {country}"))
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn five_customers_twenty_orders_scenario() {
    init_logging();
    let mut engine = SeedEngine::build_test("scenario".into(), 12345).unwrap();
    let plan = InsertPlan {
        customers: 5,
        orders: 20,
        batch_size: 7,
        ..InsertPlan::default()
    };
    let report = engine.insert(&plan, Box::new(StubProvider)).unwrap();

    assert_eq!(report.customers, 5);
    assert_eq!(report.orders, 20);
    assert_eq!(engine.store.customer_count().unwrap(), 5);
    assert_eq!(engine.store.order_count().unwrap(), 20);

    let customers = engine.store.customers().unwrap();
    let customer_ids: HashSet<i64> = customers.iter().map(|c| c.customer_id).collect();
    let emails: HashSet<&str> = customers.iter().map(|c| c.email.as_str()).collect();
    assert_eq!(customer_ids.len(), 5);
    assert_eq!(emails.len(), 5);

    let orders = engine.store.orders().unwrap();
    let order_ids: HashSet<i64> = orders.iter().map(|o| o.order_id).collect();
    assert_eq!(order_ids.len(), 20);
    for o in &orders {
        assert!(customer_ids.contains(&o.customer_id));
        assert!(o.shipping_address.starts_with("1 Stub Street"), "{}", o.shipping_address);
    }
    // Warm-up lookups count as provided too.
    assert_eq!(report.addresses.provided, 25);
    assert_eq!(report.segments.values().sum::<usize>(), 5);
}

#[test]
fn clean_insert_replaces_previous_rows() {
    init_logging();
    let mut engine = SeedEngine::build_test("clean".into(), 1).unwrap();
    let first = InsertPlan {
        customers: 10,
        orders: 30,
        ..InsertPlan::default()
    };
    engine.insert(&first, Box::new(DisabledProvider)).unwrap();

    engine.run_id = "clean-2".into();
    let second = InsertPlan {
        customers: 4,
        orders: 8,
        clean: true,
        ..InsertPlan::default()
    };
    let report = engine.insert(&second, Box::new(DisabledProvider)).unwrap();

    assert_eq!(report.cleaned, Some((10, 30)));
    assert_eq!(engine.store.customer_count().unwrap(), 4);
    assert_eq!(engine.store.order_count().unwrap(), 8);
}

#[test]
fn repeated_inserts_accumulate_without_id_collisions() {
    let mut engine = SeedEngine::build_test("acc".into(), 5).unwrap();
    let plan = InsertPlan {
        customers: 20,
        orders: 50,
        ..InsertPlan::default()
    };
    engine.insert(&plan, Box::new(DisabledProvider)).unwrap();
    engine.run_id = "acc-2".into();
    engine.insert(&plan, Box::new(DisabledProvider)).unwrap();

    assert_eq!(engine.store.customer_count().unwrap(), 40);
    assert_eq!(engine.store.order_count().unwrap(), 100);
}

#[test]
fn orders_without_customers_are_refused() {
    let mut engine = SeedEngine::build_test("empty".into(), 9).unwrap();
    let plan = InsertPlan {
        customers: 0,
        orders: 10,
        ..InsertPlan::default()
    };
    let err = engine.insert(&plan, Box::new(DisabledProvider)).unwrap_err();
    assert!(matches!(err, SeedError::EmptyCustomerPool));
}

#[test]
fn too_many_customers_for_the_id_range_is_fatal() {
    let mut engine = SeedEngine::build_test("tiny".into(), 9).unwrap();
    engine.config.identity.customer_ids.max = engine.config.identity.customer_ids.min + 2;
    let plan = InsertPlan {
        customers: 4,
        orders: 0,
        ..InsertPlan::default()
    };
    let err = engine.insert(&plan, Box::new(DisabledProvider)).unwrap_err();
    assert!(matches!(err, SeedError::IdSpaceExhausted { .. }));
}

#[test]
fn reports_cover_inserted_orders() {
    let mut engine = SeedEngine::build_test("reports".into(), 77).unwrap();
    let plan = InsertPlan {
        customers: 10,
        orders: 200,
        ..InsertPlan::default()
    };
    engine.insert(&plan, Box::new(DisabledProvider)).unwrap();

    let top = engine.store.top_customers(10).unwrap();
    assert_eq!(top.len(), 10);
    for pair in top.windows(2) {
        assert!(pair[0].total_spent >= pair[1].total_spent);
    }
    let total_orders: i64 = top.iter().map(|s| s.total_orders).sum();
    assert_eq!(total_orders, 200);

    let best = &top[0];
    let summary = engine.store.customer_summary(best.customer_id).unwrap().unwrap();
    assert_eq!(&summary, best);

    let owned = engine.store.orders_for_customer(best.customer_id).unwrap();
    assert_eq!(owned.len() as i64, best.total_orders);
    assert!(owned.iter().all(|o| o.customer_id == best.customer_id));
    let spent: f64 = owned.iter().map(|o| o.total).sum();
    assert!((spent - best.total_spent).abs() < 0.01, "{spent} vs {}", best.total_spent);

    let customer = engine.store.customer(best.customer_id).unwrap().unwrap();
    assert_eq!(customer.customer_id, best.customer_id);
    assert!(engine.store.customer(-1).unwrap().is_none());

    let since = engine.clock.days_ago(730);
    let recent = engine
        .store
        .recent_activity(best.customer_id, since, RECENT_ACTIVITY_LIMIT)
        .unwrap();
    assert_eq!(recent.len(), (best.total_orders as usize).min(RECENT_ACTIVITY_LIMIT));
    for pair in recent.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }
}
