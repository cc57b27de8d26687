//! orderseed-core: synthetic customer/order generation for seeding test databases.

pub mod address;
pub mod clock;
pub mod config;
pub mod customer;
pub mod engine;
pub mod error;
pub mod identity;
pub mod name_generator;
pub mod order;
pub mod retry;
pub mod rng;
pub mod segment;
pub mod simulator;
pub mod store;
pub mod types;
