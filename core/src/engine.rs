//! The seeding engine.
//!
//! EXECUTION ORDER for `insert` (fixed, never reordered):
//!   1. Optional clean of existing rows
//!   2. seed_run row
//!   3. Customers, generated and flushed in batches
//!   4. Segment assignment (once, immutable)
//!   5. Address warm-up for the leading destinations
//!   6. Orders, generated lazily and flushed in batches
//!
//! RULES:
//!   - All randomness flows through the RngBank, one stream per concern.
//!   - The clock is frozen for the whole run.
//!   - Collaborator failures other than address lookups abort the run.
//!     Batches already committed stay committed.

use crate::{
    address::{AddressProvider, AddressStats, LocalAddressSynthesizer, ShippingAddresses},
    clock::RunClock,
    config::GeneratorConfig,
    customer::{CustomerFactory, CustomerPool},
    error::{SeedError, SeedResult},
    rng::{RngBank, StreamSlot},
    segment::{Segment, SegmentAssigner},
    simulator::OrderSimulator,
    store::SeedStore,
    types::RunId,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// What one `insert` call should produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertPlan {
    pub customers: usize,
    pub orders: usize,
    pub batch_size: usize,
    /// Delete existing rows first.
    pub clean: bool,
    /// Destinations resolved once up front so a caching provider starts warm.
    pub warm_up_destinations: usize,
}

impl Default for InsertPlan {
    fn default() -> Self {
        Self {
            customers: 100,
            orders: 500,
            batch_size: 100,
            clean: false,
            warm_up_destinations: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InsertReport {
    pub run_id: RunId,
    pub seed: u64,
    pub customers: usize,
    pub orders: usize,
    pub segments: BTreeMap<Segment, usize>,
    pub addresses: AddressStats,
    /// (customers, orders) removed by a clean, if one ran.
    pub cleaned: Option<(usize, usize)>,
}

pub struct SeedEngine {
    pub run_id: RunId,
    pub clock: RunClock,
    pub rng_bank: RngBank,
    pub config: GeneratorConfig,
    pub store: SeedStore,
    local: LocalAddressSynthesizer,
}

impl SeedEngine {
    /// Validate the configuration and make sure the schema exists.
    pub fn new(
        run_id: RunId,
        seed: u64,
        config: GeneratorConfig,
        clock: RunClock,
        store: SeedStore,
    ) -> SeedResult<Self> {
        config.validate()?;
        store.migrate()?;
        Ok(Self {
            run_id,
            clock,
            rng_bank: RngBank::new(seed),
            config,
            store,
            local: LocalAddressSynthesizer::standard(),
        })
    }

    /// In-memory engine with the built-in tables and a pinned clock.
    pub fn build_test(run_id: RunId, seed: u64) -> SeedResult<Self> {
        let now = NaiveDate::from_ymd_opt(2025, 6, 15)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .ok_or_else(|| SeedError::InvalidConfig("bad test clock".into()))?;
        Self::new(
            run_id,
            seed,
            GeneratorConfig::standard(),
            RunClock::fixed(now),
            SeedStore::in_memory()?,
        )
    }

    pub fn local_synthesizer(&self) -> &LocalAddressSynthesizer {
        &self.local
    }

    /// Generate and persist customers and orders according to `plan`.
    pub fn insert(
        &mut self,
        plan: &InsertPlan,
        provider: Box<dyn AddressProvider>,
    ) -> SeedResult<InsertReport> {
        if plan.batch_size == 0 {
            return Err(SeedError::InvalidConfig("batch_size must be > 0".into()));
        }

        let cleaned = if plan.clean {
            let (customers, orders) = self.store.delete_all()?;
            log::info!("store: cleaned {customers} customers and {orders} orders");
            Some((customers, orders))
        } else {
            None
        };

        let seed = self.rng_bank.master_seed();
        self.store
            .insert_run(&self.run_id, seed, env!("CARGO_PKG_VERSION"), self.clock.now())?;
        log::info!(
            "run={} seed={seed}: inserting {} customers, {} orders",
            self.run_id,
            plan.customers,
            plan.orders
        );

        // ── Customers ──────────────────────────────────────────
        let mut customer_rng = self.rng_bank.for_stream(StreamSlot::Customers);
        let mut factory = CustomerFactory::new(&self.config, &self.local, &self.clock);
        factory.exclude_existing(self.store.customer_ids()?, self.store.customer_emails()?);
        let pool = CustomerPool::from_factory(&mut factory, plan.customers, &mut customer_rng)?;

        let mut customers = 0;
        for batch in pool.records().chunks(plan.batch_size) {
            customers += self.store.insert_customers(&self.run_id, batch)?;
            log::debug!("customer: flushed {customers}/{}", pool.len());
        }
        log::info!("customer: inserted {customers} customers");

        // ── Segments ───────────────────────────────────────────
        let mut segment_rng = self.rng_bank.for_stream(StreamSlot::Segments);
        let customer_ids = pool.ids();
        let segments =
            SegmentAssigner::assign(&customer_ids, &self.config.segments, &mut segment_rng);
        let segment_counts = segments.counts();
        for (segment, n) in &segment_counts {
            log::info!("segment: {segment} = {n} customers");
        }

        // ── Addresses ──────────────────────────────────────────
        let mut addresses = ShippingAddresses::new(
            provider,
            self.local.clone(),
            self.rng_bank.for_stream(StreamSlot::Addresses),
        );

        // ── Orders ─────────────────────────────────────────────
        let mut orders = 0;
        if plan.orders > 0 {
            let mut simulator = OrderSimulator::new(
                self.config.clone(),
                self.clock,
                customer_ids,
                segments,
                self.rng_bank.for_stream(StreamSlot::Orders),
            )?;
            simulator.exclude_order_ids(self.store.order_ids()?);
            simulator.reserve(plan.orders)?;

            let warm: Vec<String> = self
                .config
                .destinations
                .iter()
                .take(plan.warm_up_destinations)
                .map(|d| d.country.clone())
                .collect();
            addresses.warm_up(&warm);

            let mut batch = Vec::with_capacity(plan.batch_size);
            for order in simulator.orders(plan.orders, &mut addresses) {
                batch.push(order?);
                if batch.len() == plan.batch_size {
                    orders += self.store.insert_orders(&self.run_id, &batch)?;
                    batch.clear();
                    log::info!("order: {orders}/{} inserted", plan.orders);
                }
            }
            if !batch.is_empty() {
                orders += self.store.insert_orders(&self.run_id, &batch)?;
            }
        }

        let stats = addresses.stats();
        log::info!(
            "order: inserted {orders} orders (addresses: {} provided, {} synthesized, {} fallbacks)",
            stats.provided,
            stats.synthesized,
            stats.fallbacks
        );

        Ok(InsertReport {
            run_id: self.run_id.clone(),
            seed,
            customers,
            orders,
            segments: segment_counts,
            addresses: stats,
            cleaned,
        })
    }
}
