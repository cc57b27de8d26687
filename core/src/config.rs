use crate::{
    error::{SeedError, SeedResult},
    order::{OrderStatus, PaymentMethod},
    segment::Segment,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const WEIGHT_TOLERANCE: f64 = 1e-6;

// ── Segments ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentProfile {
    pub segment: Segment,
    /// Share of the customer population drawn into this segment.
    pub weight: f64,
    /// Relative order frequency; customer selection weight.
    pub freq_mult: f64,
    pub value_min: f64,
    pub value_max: f64,
}

// ── Geography ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountryWeight {
    pub country: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerModel {
    pub countries: Vec<CountryWeight>,
    pub missing_phone_rate: f64,
}

// ── Order dates ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeBand {
    pub label: String,
    pub weight: f64,
    /// Hours of day (0–23) the band covers; one is picked uniformly.
    pub hours: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DateModel {
    pub lookback_days: i64,
    pub max_attempts: usize,
    /// January first.
    pub seasonal_multipliers: [f64; 12],
    pub weekend_penalty: f64,
    /// Acceptance probability is `weight / acceptance_divisor`.
    pub acceptance_divisor: f64,
    pub time_bands: Vec<TimeBand>,
}

// ── Order amounts ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AmountModel {
    pub pareto_alpha: f64,
    pub noise_min: f64,
    pub noise_max: f64,
    pub floor: f64,
    pub ceiling: f64,
}

// ── Status and payment policies ───────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusWeight {
    pub status: OrderStatus,
    pub weight: f64,
}

/// Applies when `days_old > older_than_days`; `None` is the catch-all
/// bucket and must come last.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusBucket {
    pub older_than_days: Option<i64>,
    pub outcomes: Vec<StatusWeight>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentWeight {
    pub method: PaymentMethod,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentPolicy {
    pub by_country: BTreeMap<String, Vec<PaymentWeight>>,
    pub default: Vec<PaymentWeight>,
}

// ── Identifiers ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdRange {
    pub min: i64,
    pub max: i64,
}

impl IdRange {
    /// Number of ids in the range, saturating at `u64::MAX`.
    pub fn capacity(&self) -> u64 {
        let span = i128::from(self.max) - i128::from(self.min) + 1;
        u64::try_from(span.max(0)).unwrap_or(u64::MAX)
    }

    pub fn contains(&self, id: i64) -> bool {
        (self.min..=self.max).contains(&id)
    }

    fn overlaps(&self, other: &IdRange) -> bool {
        self.min <= other.max && other.min <= self.max
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdentityConfig {
    pub customer_ids: IdRange,
    pub order_ids: IdRange,
    /// Resampling guard per identifier.
    pub max_attempts: usize,
}

// ── Root ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratorConfig {
    pub segments: Vec<SegmentProfile>,
    pub customers: CustomerModel,
    pub destinations: Vec<CountryWeight>,
    pub dates: DateModel,
    pub amounts: AmountModel,
    pub statuses: Vec<StatusBucket>,
    pub payments: PaymentPolicy,
    pub identity: IdentityConfig,
}

impl GeneratorConfig {
    /// Load a full configuration from a JSON file and validate it.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: GeneratorConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Built-in tables. `data/generator_config.json` mirrors these.
    pub fn standard() -> Self {
        let segments = vec![
            profile(Segment::Vip, 0.10, 5.0, 200.0, 1000.0),
            profile(Segment::Regular, 0.50, 1.0, 50.0, 200.0),
            profile(Segment::New, 0.30, 0.2, 20.0, 80.0),
            profile(Segment::Inactive, 0.10, 0.05, 10.0, 50.0),
        ];

        let customers = CustomerModel {
            countries: countries(&[
                ("Canada", 0.5),
                ("United States", 0.3),
                ("United Kingdom", 0.1),
                ("Germany", 0.05),
                ("France", 0.05),
            ]),
            missing_phone_rate: 0.05,
        };

        let destinations = countries(&[
            ("Canada", 0.35),
            ("United States", 0.25),
            ("United Kingdom", 0.1),
            ("Germany", 0.08),
            ("France", 0.06),
            ("Italy", 0.04),
            ("Spain", 0.03),
            ("Japan", 0.03),
            ("Australia", 0.03),
            ("South Korea", 0.01),
            ("Netherlands", 0.01),
            ("Switzerland", 0.01),
        ]);

        let dates = DateModel {
            lookback_days: 730,
            max_attempts: 10,
            seasonal_multipliers: [0.8, 0.8, 0.9, 1.0, 1.0, 1.0, 0.9, 0.9, 1.1, 1.2, 1.6, 1.8],
            weekend_penalty: 0.7,
            acceptance_divisor: 2.0,
            time_bands: vec![
                TimeBand {
                    label: "business".into(),
                    weight: 0.70,
                    hours: (9..17).collect(),
                },
                TimeBand {
                    label: "evening".into(),
                    weight: 0.20,
                    hours: (17..22).collect(),
                },
                TimeBand {
                    label: "night".into(),
                    weight: 0.10,
                    hours: (0..9).chain(22..24).collect(),
                },
            ],
        };

        let amounts = AmountModel {
            pareto_alpha: 3.0,
            noise_min: 0.8,
            noise_max: 1.2,
            floor: 5.0,
            ceiling: 5000.0,
        };

        use OrderStatus::*;
        let statuses = vec![
            bucket(Some(7), &[(Delivered, 0.90), (Returned, 0.08), (Cancelled, 0.02)]),
            bucket(Some(3), &[(Shipped, 0.3), (Delivered, 0.7)]),
            bucket(Some(1), &[(Processing, 0.4), (Shipped, 0.6)]),
            bucket(None, &[(Pending, 0.3), (Processing, 0.7)]),
        ];

        use PaymentMethod::*;
        let mut by_country = BTreeMap::new();
        by_country.insert(
            "United States".to_string(),
            methods(&[(CreditCard, 0.6), (Paypal, 0.2), (DebitCard, 0.15), (Other, 0.05)]),
        );
        by_country.insert(
            "Canada".to_string(),
            methods(&[(CreditCard, 0.5), (DebitCard, 0.3), (Paypal, 0.15), (Other, 0.05)]),
        );
        by_country.insert(
            "Germany".to_string(),
            methods(&[(BankTransfer, 0.4), (Paypal, 0.3), (CreditCard, 0.25), (Other, 0.05)]),
        );
        by_country.insert(
            "United Kingdom".to_string(),
            methods(&[(CreditCard, 0.5), (DebitCard, 0.3), (Paypal, 0.15), (Other, 0.05)]),
        );
        by_country.insert(
            "Japan".to_string(),
            methods(&[(CreditCard, 0.4), (Cash, 0.2), (DigitalWallet, 0.3), (Other, 0.1)]),
        );
        let payments = PaymentPolicy {
            by_country,
            default: methods(&[(CreditCard, 0.5), (Paypal, 0.3), (DebitCard, 0.1), (Other, 0.1)]),
        };

        let identity = IdentityConfig {
            customer_ids: IdRange {
                min: 100_000,
                max: 9_999_999,
            },
            order_ids: IdRange {
                min: 10_000_000,
                max: 999_999_999,
            },
            max_attempts: 1_000,
        };

        Self {
            segments,
            customers,
            destinations,
            dates,
            amounts,
            statuses,
            payments,
            identity,
        }
    }

    pub fn segment_profile(&self, segment: Segment) -> Option<&SegmentProfile> {
        self.segments.iter().find(|p| p.segment == segment)
    }

    /// Payment table for a destination; unknown countries use the default.
    pub fn payment_table(&self, country: &str) -> &[PaymentWeight] {
        self.payments
            .by_country
            .get(country)
            .map(Vec::as_slice)
            .unwrap_or(&self.payments.default)
    }

    /// First bucket whose threshold `days_old` exceeds, else the catch-all.
    pub fn status_bucket(&self, days_old: i64) -> Option<&StatusBucket> {
        self.statuses
            .iter()
            .find(|b| b.older_than_days.map_or(true, |t| days_old > t))
    }

    pub fn validate(&self) -> SeedResult<()> {
        check_weights("segments", self.segments.iter().map(|s| s.weight))?;
        for s in &self.segments {
            if s.freq_mult <= 0.0 {
                return invalid(format!("segment {} has non-positive freq_mult", s.segment));
            }
            if s.value_min > s.value_max {
                return invalid(format!("segment {} has value_min > value_max", s.segment));
            }
        }
        for seg in Segment::ALL {
            if self.segment_profile(seg).is_none() {
                return invalid(format!("segment {seg} has no profile"));
            }
        }

        check_weights("customer countries", self.customers.countries.iter().map(|c| c.weight))?;
        if !(0.0..=1.0).contains(&self.customers.missing_phone_rate) {
            return invalid("missing_phone_rate must be within [0, 1]".into());
        }
        check_weights("destinations", self.destinations.iter().map(|c| c.weight))?;

        let d = &self.dates;
        if d.lookback_days < 0 || d.max_attempts == 0 || d.acceptance_divisor <= 0.0 {
            return invalid("date model needs lookback >= 0, attempts > 0, divisor > 0".into());
        }
        check_weights("time bands", d.time_bands.iter().map(|b| b.weight))?;
        for band in &d.time_bands {
            if band.hours.is_empty() || band.hours.iter().any(|h| *h > 23) {
                return invalid(format!("time band {} has invalid hours", band.label));
            }
        }

        let a = &self.amounts;
        if a.floor > a.ceiling || a.noise_min > a.noise_max || a.pareto_alpha <= 0.0 {
            return invalid("amount model bounds are inverted".into());
        }

        match self.statuses.last() {
            Some(last) if last.older_than_days.is_none() => {}
            _ => return invalid("status policy must end with a catch-all bucket".into()),
        }
        for (i, b) in self.statuses.iter().enumerate() {
            check_weights(&format!("status bucket {i}"), b.outcomes.iter().map(|o| o.weight))?;
        }

        check_weights("default payments", self.payments.default.iter().map(|p| p.weight))?;
        for (country, table) in &self.payments.by_country {
            check_weights(&format!("payments for {country}"), table.iter().map(|p| p.weight))?;
        }

        let ids = &self.identity;
        if ids.customer_ids.min > ids.customer_ids.max || ids.order_ids.min > ids.order_ids.max {
            return invalid("identifier ranges are inverted".into());
        }
        if ids.customer_ids.overlaps(&ids.order_ids) {
            return invalid("customer and order identifier ranges overlap".into());
        }
        if ids.max_attempts == 0 {
            return invalid("identity max_attempts must be > 0".into());
        }
        Ok(())
    }
}

fn invalid(msg: String) -> SeedResult<()> {
    Err(SeedError::InvalidConfig(msg))
}

fn check_weights(table: &str, weights: impl Iterator<Item = f64>) -> SeedResult<()> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for w in weights {
        if w < 0.0 {
            return invalid(format!("{table} has a negative weight"));
        }
        sum += w;
        count += 1;
    }
    if count == 0 {
        return invalid(format!("{table} is empty"));
    }
    if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
        return invalid(format!("{table} weights sum to {sum}, expected 1"));
    }
    Ok(())
}

fn profile(segment: Segment, weight: f64, freq_mult: f64, min: f64, max: f64) -> SegmentProfile {
    SegmentProfile {
        segment,
        weight,
        freq_mult,
        value_min: min,
        value_max: max,
    }
}

fn countries(pairs: &[(&str, f64)]) -> Vec<CountryWeight> {
    pairs
        .iter()
        .map(|(country, weight)| CountryWeight {
            country: (*country).into(),
            weight: *weight,
        })
        .collect()
}

fn bucket(older_than_days: Option<i64>, pairs: &[(OrderStatus, f64)]) -> StatusBucket {
    StatusBucket {
        older_than_days,
        outcomes: pairs
            .iter()
            .map(|(status, weight)| StatusWeight {
                status: *status,
                weight: *weight,
            })
            .collect(),
    }
}

fn methods(pairs: &[(PaymentMethod, f64)]) -> Vec<PaymentWeight> {
    pairs
        .iter()
        .map(|(method, weight)| PaymentWeight {
            method: *method,
            weight: *weight,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_config_is_valid() {
        GeneratorConfig::standard().validate().unwrap();
    }

    #[test]
    fn shipped_config_file_matches_builtin_tables() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/generator_config.json");
        let loaded = GeneratorConfig::load(path).unwrap();
        assert_eq!(loaded, GeneratorConfig::standard());
    }

    #[test]
    fn missing_config_file_names_the_path() {
        let err = GeneratorConfig::load("/nonexistent/generator_config.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/generator_config.json"));
    }

    #[test]
    fn overlapping_id_ranges_are_rejected() {
        let mut config = GeneratorConfig::standard();
        config.identity.order_ids.min = config.identity.customer_ids.max;
        assert!(matches!(config.validate(), Err(SeedError::InvalidConfig(_))));
    }

    #[test]
    fn full_width_id_range_saturates_capacity() {
        let wide = IdRange { min: i64::MIN, max: i64::MAX };
        assert_eq!(wide.capacity(), u64::MAX);
        assert_eq!(IdRange { min: -5, max: 5 }.capacity(), 11);
        assert_eq!(IdRange { min: 10, max: 9 }.capacity(), 0);
    }

    #[test]
    fn segment_weights_must_sum_to_one() {
        let mut config = GeneratorConfig::standard();
        config.segments[0].weight = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_country_uses_default_payment_table() {
        let config = GeneratorConfig::standard();
        assert_eq!(config.payment_table("Atlantis"), config.payments.default.as_slice());
        assert_ne!(config.payment_table("Japan"), config.payments.default.as_slice());
    }

    #[test]
    fn status_buckets_follow_age_thresholds() {
        let config = GeneratorConfig::standard();
        assert_eq!(config.status_bucket(8).unwrap().older_than_days, Some(7));
        assert_eq!(config.status_bucket(7).unwrap().older_than_days, Some(3));
        assert_eq!(config.status_bucket(2).unwrap().older_than_days, Some(1));
        assert_eq!(config.status_bucket(1).unwrap().older_than_days, None);
        assert_eq!(config.status_bucket(0).unwrap().older_than_days, None);
    }
}
