//! Customer identities.
//!
//! Customers are generated once per run and never mutated afterwards; the
//! order simulator only reads their ids.

use crate::{
    address::LocalAddressSynthesizer,
    clock::RunClock,
    config::GeneratorConfig,
    error::SeedResult,
    identity::{IdAllocator, UniqueKeys},
    name_generator::NameGenerator,
    rng::StreamRng,
    types::{CountryName, CustomerId},
};
use serde::{Deserialize, Serialize};

/// Longest phone string the store accepts.
pub const MAX_PHONE_LEN: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerRecord {
    pub customer_id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: String,
    pub city: String,
    pub country: CountryName,
}

/// Produces customers one at a time with run-wide unique ids and emails.
pub struct CustomerFactory<'a> {
    config: &'a GeneratorConfig,
    local: &'a LocalAddressSynthesizer,
    ids: IdAllocator,
    emails: UniqueKeys,
    stamp: String,
}

impl<'a> CustomerFactory<'a> {
    pub fn new(config: &'a GeneratorConfig, local: &'a LocalAddressSynthesizer, clock: &RunClock) -> Self {
        Self {
            config,
            local,
            ids: IdAllocator::new(
                "customer id",
                config.identity.customer_ids,
                config.identity.max_attempts,
            ),
            emails: UniqueKeys::new("customer email", config.identity.max_attempts),
            stamp: clock.email_stamp(),
        }
    }

    /// Never reissue ids or emails already present in the store.
    pub fn exclude_existing(
        &mut self,
        ids: impl IntoIterator<Item = CustomerId>,
        emails: impl IntoIterator<Item = String>,
    ) {
        self.ids.mark_used(ids);
        self.emails.mark_used(emails);
    }

    pub fn reserve(&self, count: usize) -> SeedResult<()> {
        self.ids.ensure_capacity(count)
    }

    pub fn next_customer(&mut self, rng: &mut StreamRng) -> SeedResult<CustomerRecord> {
        let country = rng
            .pick_weighted(&self.config.customers.countries, |c| c.weight)
            .map(|c| c.country.clone())
            .unwrap_or_default();

        let (first, last) = NameGenerator::generate_full_name(&country, rng);
        let local = self.local;
        let stamp = &self.stamp;
        let email = self.emails.claim(rng, |rng| {
            let user = NameGenerator::generate_user_name(&first, &last, rng);
            let suffix = rng.int_inclusive(0, 9999);
            let domain = local.email_domain(&country, rng);
            format!("{user}{stamp}{suffix:04}@{domain}")
        })?;

        let customer_id = self.ids.allocate(rng)?;

        let phone = if rng.chance(self.config.customers.missing_phone_rate) {
            None
        } else {
            let mut phone = self.local.phone_number(&country, rng);
            phone.truncate(MAX_PHONE_LEN);
            Some(phone)
        };

        let address = self.local.street_address(&country, rng);
        let (_, city) = self.local.region_and_city(&country, rng);

        Ok(CustomerRecord {
            customer_id,
            name: format!("{first} {last}"),
            email,
            phone,
            address,
            city,
            country,
        })
    }
}

/// The customers available to own orders in this run.
#[derive(Debug, Clone, Default)]
pub struct CustomerPool {
    customers: Vec<CustomerRecord>,
}

impl CustomerPool {
    /// Generate `count` customers, failing if the id space can't hold them.
    pub fn generate(
        count: usize,
        config: &GeneratorConfig,
        local: &LocalAddressSynthesizer,
        clock: &RunClock,
        rng: &mut StreamRng,
    ) -> SeedResult<Self> {
        let mut factory = CustomerFactory::new(config, local, clock);
        Self::from_factory(&mut factory, count, rng)
    }

    pub fn from_factory(
        factory: &mut CustomerFactory<'_>,
        count: usize,
        rng: &mut StreamRng,
    ) -> SeedResult<Self> {
        factory.reserve(count)?;
        let customers = (0..count)
            .map(|_| factory.next_customer(rng))
            .collect::<SeedResult<Vec<_>>>()?;
        Ok(Self { customers })
    }

    pub fn ids(&self) -> Vec<CustomerId> {
        self.customers.iter().map(|c| c.customer_id).collect()
    }

    pub fn get(&self, customer_id: CustomerId) -> Option<&CustomerRecord> {
        self.customers.iter().find(|c| c.customer_id == customer_id)
    }

    pub fn records(&self) -> &[CustomerRecord] {
        &self.customers
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}
