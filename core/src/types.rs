//! Shared primitive types used across the generator.

/// A customer identifier. Drawn from a sparse numeric range, never sequential.
pub type CustomerId = i64;

/// An order identifier. Lives in a range disjoint from customer ids.
pub type OrderId = i64;

/// The canonical seeding-run identifier.
pub type RunId = String;

/// A country name exactly as it appears in the configuration tables
/// (e.g. "Canada", "United States").
pub type CountryName = String;
