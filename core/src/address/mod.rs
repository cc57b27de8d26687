//! Shipping address resolution.
//!
//! RULE: Address lookups never fail an order.
//! `ShippingAddresses` asks the configured `AddressProvider` first and
//! falls back to the local synthesizer on any error, logging the reason.

pub mod formats;
pub mod local;
pub mod nominatim;

pub use formats::{AddressLayout, AddressParts, CountryFormat};
pub use local::LocalAddressSynthesizer;
pub use nominatim::{NominatimConfig, NominatimProvider};

use crate::rng::StreamRng;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AddressError {
    #[error("address provider is disabled")]
    Disabled,

    #[error("address lookup timed out")]
    Timeout,

    #[error("address lookup failed: {0}")]
    Http(reqwest::Error),

    #[error("malformed provider response: {0}")]
    Malformed(String),

    #[error("provider returned {returned} for a {requested} request")]
    CountryMismatch { requested: String, returned: String },

    #[error("city '{0}' looks like a street name")]
    SuspectCity(String),

    #[error("provider had no result for {0}")]
    NoResult(String),
}

impl From<reqwest::Error> for AddressError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AddressError::Timeout
        } else if e.is_decode() {
            AddressError::Malformed(e.to_string())
        } else {
            AddressError::Http(e)
        }
    }
}

/// External collaborator that turns a country into a shipping address.
pub trait AddressProvider {
    fn name(&self) -> &'static str;

    /// False for providers that never answer (lets callers skip warm-up).
    fn is_live(&self) -> bool {
        true
    }

    fn resolve(&mut self, country: &str, rng: &mut StreamRng) -> Result<String, AddressError>;
}

/// Provider used when lookups are switched off.
pub struct DisabledProvider;

impl AddressProvider for DisabledProvider {
    fn name(&self) -> &'static str {
        "disabled"
    }

    fn is_live(&self) -> bool {
        false
    }

    fn resolve(&mut self, _country: &str, _rng: &mut StreamRng) -> Result<String, AddressError> {
        Err(AddressError::Disabled)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AddressStats {
    /// Addresses returned by the provider.
    pub provided: u64,
    /// Addresses synthesized because the provider is disabled.
    pub synthesized: u64,
    /// Addresses synthesized after a provider failure.
    pub fallbacks: u64,
}

/// Provider-first address source with a deterministic local fallback.
pub struct ShippingAddresses {
    provider: Box<dyn AddressProvider>,
    local: LocalAddressSynthesizer,
    rng: StreamRng,
    stats: AddressStats,
}

impl ShippingAddresses {
    pub fn new(provider: Box<dyn AddressProvider>, local: LocalAddressSynthesizer, rng: StreamRng) -> Self {
        Self {
            provider,
            local,
            rng,
            stats: AddressStats::default(),
        }
    }

    pub fn local_only(local: LocalAddressSynthesizer, rng: StreamRng) -> Self {
        Self::new(Box::new(DisabledProvider), local, rng)
    }

    /// Always returns a non-empty address.
    pub fn resolve(&mut self, country: &str) -> String {
        match self.provider.resolve(country, &mut self.rng) {
            Ok(address) if !address.trim().is_empty() => {
                self.stats.provided += 1;
                address
            }
            Ok(_) => {
                log::warn!(
                    "address: {} returned an empty address for {country}; using local address",
                    self.provider.name()
                );
                self.stats.fallbacks += 1;
                self.local.synthesize(country, &mut self.rng)
            }
            Err(AddressError::Disabled) => {
                self.stats.synthesized += 1;
                self.local.synthesize(country, &mut self.rng)
            }
            Err(e) => {
                log::warn!(
                    "address: {} failed for {country}: {e}; using local address",
                    self.provider.name()
                );
                self.stats.fallbacks += 1;
                self.local.synthesize(country, &mut self.rng)
            }
        }
    }

    /// Resolve each country once so a caching provider starts warm.
    pub fn warm_up(&mut self, countries: &[String]) {
        if !self.provider.is_live() {
            return;
        }
        log::info!("address: pre-generating addresses for {} destinations", countries.len());
        for country in countries {
            self.resolve(country);
        }
    }

    pub fn stats(&self) -> AddressStats {
        self.stats
    }
}
