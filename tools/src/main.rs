//! seed-runner: seed and query a customer/order database with synthetic data.
//!
//! Usage:
//!   seed-runner insert --customers 100 --orders 500 --seed 42 --db shop.db
//!   seed-runner insert --no-api --clean
//!   seed-runner query --customer-id 1234567
//!   seed-runner delete --confirm
//!   seed-runner recreate --confirm

use anyhow::{bail, Context, Result};
use chrono::Months;
use clap::{Parser, ValueEnum};
use orderseed_core::{
    address::{AddressProvider, DisabledProvider, NominatimConfig, NominatimProvider},
    clock::RunClock,
    config::GeneratorConfig,
    engine::{InsertPlan, SeedEngine},
    store::{SeedStore, RECENT_ACTIVITY_LIMIT},
    types::CustomerId,
};
use serde_json::json;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Action {
    /// Generate customers and orders
    Insert,
    /// Show recent activity for a customer, or the top spenders
    Query,
    /// Delete every generated row (requires --confirm)
    Delete,
    /// Drop and rebuild the schema (requires --confirm)
    Recreate,
}

#[derive(Parser, Debug)]
#[command(name = "seed-runner")]
#[command(about = "Seed a test database with realistic customers and orders", long_about = None)]
struct Args {
    /// What to do
    #[arg(value_enum)]
    action: Action,

    /// Customers to generate
    #[arg(long, default_value = "100")]
    customers: usize,

    /// Orders to generate
    #[arg(long, default_value = "500")]
    orders: usize,

    /// Customer to report on (query)
    #[arg(long)]
    customer_id: Option<CustomerId>,

    /// Required for delete and recreate
    #[arg(long)]
    confirm: bool,

    /// Delete existing rows before inserting
    #[arg(long)]
    clean: bool,

    /// Master seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// SQLite database path
    #[arg(long, env = "ORDERSEED_DB_PATH", default_value = "orderseed.db")]
    db: String,

    /// Generator tables (JSON); built-in tables when omitted
    #[arg(long)]
    config: Option<String>,

    /// Never call the address API
    #[arg(long)]
    no_api: bool,

    /// Use locally synthesized addresses for every order
    #[arg(long)]
    force_fallback: bool,

    /// Rows per committed batch
    #[arg(long, default_value = "100")]
    batch_size: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let store = SeedStore::open(&args.db).with_context(|| format!("Cannot open {}", args.db))?;
    store.migrate()?;

    match args.action {
        Action::Insert => insert(&args, store),
        Action::Query => query(&args, &store),
        Action::Delete => {
            if !args.confirm {
                bail!("delete removes every customer and order; re-run with --confirm");
            }
            let (customers, orders) = store.delete_all()?;
            print_json(&json!({
                "records": customers + orders,
                "deleted": { "customers": customers, "orders": orders },
            }))
        }
        Action::Recreate => {
            if !args.confirm {
                bail!("recreate drops every table; re-run with --confirm");
            }
            store.recreate()?;
            print_json(&json!({ "records": 0, "recreated": true }))
        }
    }
}

fn insert(args: &Args, store: SeedStore) -> Result<()> {
    let config = match &args.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::standard(),
    };
    let seed = args
        .seed
        .unwrap_or_else(|| uuid::Uuid::new_v4().as_u64_pair().0);
    let run_id = format!("run-{}", uuid::Uuid::new_v4());
    log::info!("run={run_id} seed={seed} db={}", args.db);

    let mut engine = SeedEngine::new(run_id, seed, config, RunClock::system(), store)?;
    let provider = address_provider(args, &engine);
    let plan = InsertPlan {
        customers: args.customers,
        orders: args.orders,
        batch_size: args.batch_size,
        clean: args.clean,
        ..InsertPlan::default()
    };
    let report = engine.insert(&plan, provider)?;

    print_json(&json!({
        "records": report.customers + report.orders,
        "report": report,
    }))
}

fn address_provider(args: &Args, engine: &SeedEngine) -> Box<dyn AddressProvider> {
    if args.force_fallback {
        log::info!("address: fallback forced, every address is synthesized locally");
        return Box::new(DisabledProvider);
    }
    if args.no_api {
        log::info!("address: API disabled");
        return Box::new(DisabledProvider);
    }
    match NominatimProvider::new(NominatimConfig::default(), engine.local_synthesizer().clone()) {
        Ok(provider) => Box::new(provider),
        Err(e) => {
            log::warn!("address: cannot build API client ({e}); using local addresses");
            Box::new(DisabledProvider)
        }
    }
}

fn query(args: &Args, store: &SeedStore) -> Result<()> {
    match args.customer_id {
        Some(customer_id) => {
            let now = RunClock::system().now();
            let since = now
                .checked_sub_months(Months::new(24))
                .context("recent-activity window underflows")?;
            let activity = store.recent_activity(customer_id, since, RECENT_ACTIVITY_LIMIT)?;
            let summary = store.customer_summary(customer_id)?;
            if summary.is_none() {
                log::warn!("query: customer {customer_id} not found");
            }
            print_json(&json!({
                "records": activity.len(),
                "recent_activity": activity,
                "summary": summary,
            }))
        }
        None => {
            let top = store.top_customers(10)?;
            print_json(&json!({
                "records": top.len(),
                "top_customers": top,
            }))
        }
    }
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
