//! Order simulator.
//!
//! Turns a customer pool and its segment assignments into a stream of
//! order records with correlated attributes. Each order draws, in order:
//! owning customer, date-time, total, destination, shipping address,
//! payment method, status, id.
//!
//! RULE: Status is a pure function of order age and is drawn once.
//! RULE: Address failures never abort a run (see `address`).

use crate::{
    address::ShippingAddresses,
    clock::RunClock,
    config::{DateModel, GeneratorConfig},
    error::{SeedError, SeedResult},
    identity::IdAllocator,
    order::{OrderRecord, OrderStatus, PaymentMethod},
    retry::retry_or_else,
    rng::StreamRng,
    segment::{Segment, SegmentAssigner},
    types::{CountryName, CustomerId, OrderId},
};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use rand::distributions::WeightedIndex;

pub struct OrderSimulator {
    config: GeneratorConfig,
    clock: RunClock,
    customer_ids: Vec<CustomerId>,
    /// Selection table; weight of a customer is its segment's freq_mult.
    selection: WeightedIndex<f64>,
    segments: SegmentAssigner,
    order_ids: IdAllocator,
    rng: StreamRng,
}

impl OrderSimulator {
    pub fn new(
        config: GeneratorConfig,
        clock: RunClock,
        customer_ids: Vec<CustomerId>,
        segments: SegmentAssigner,
        rng: StreamRng,
    ) -> SeedResult<Self> {
        if customer_ids.is_empty() {
            return Err(SeedError::EmptyCustomerPool);
        }

        let weights = customer_ids
            .iter()
            .map(|id| {
                let segment = segments.segment_of(*id);
                config
                    .segment_profile(segment)
                    .map(|p| p.freq_mult)
                    .ok_or_else(|| SeedError::InvalidConfig(format!("segment {segment} has no profile")))
            })
            .collect::<SeedResult<Vec<f64>>>()?;
        let selection = WeightedIndex::new(weights)
            .map_err(|e| SeedError::InvalidConfig(format!("customer selection weights: {e}")))?;

        let order_ids = IdAllocator::new(
            "order id",
            config.identity.order_ids,
            config.identity.max_attempts,
        );

        Ok(Self {
            config,
            clock,
            customer_ids,
            selection,
            segments,
            order_ids,
            rng,
        })
    }

    /// Never reissue order ids already present in the store.
    pub fn exclude_order_ids(&mut self, existing: impl IntoIterator<Item = OrderId>) {
        self.order_ids.mark_used(existing);
    }

    /// Fail before generating anything if `count` more orders can't get ids.
    pub fn reserve(&self, count: usize) -> SeedResult<()> {
        self.order_ids.ensure_capacity(count)
    }

    /// Frequency-weighted draw of the owning customer.
    pub fn select_customer(&mut self) -> CustomerId {
        let index = self.rng.sample_index(&self.selection);
        self.customer_ids[index]
    }

    /// Date-time inside the lookback window, biased by month and weekday.
    ///
    /// Candidates are accepted with probability
    /// `seasonal(month) * weekend_penalty / acceptance_divisor`. When every
    /// attempt is rejected the result is `now` minus a uniform day offset,
    /// with no time-of-day skew.
    pub fn sample_order_datetime(&mut self) -> NaiveDateTime {
        let dates = &self.config.dates;
        let clock = self.clock;
        let earliest = clock.days_ago(dates.lookback_days);

        let at = retry_or_else(
            &mut self.rng,
            dates.max_attempts,
            |rng| {
                let offset = rng.int_inclusive(0, dates.lookback_days);
                let day = clock.today() - Duration::days(offset);
                if !rng.chance(day_weight(dates, day) / dates.acceptance_divisor) {
                    return None;
                }
                let band = rng.pick_weighted(&dates.time_bands, |b| b.weight)?;
                let hour = *rng.pick(&band.hours);
                let minute = rng.int_inclusive(0, 59) as u32;
                let second = rng.int_inclusive(0, 59) as u32;
                day.and_hms_opt(hour, minute, second)
            },
            |rng| clock.days_ago(rng.int_inclusive(0, dates.lookback_days)),
        );
        at.clamp(earliest, clock.now())
    }

    /// Heavy-tailed total inside the segment's value band, then clamped to
    /// the global bounds and rounded to cents.
    pub fn sample_total(&mut self, segment: Segment) -> f64 {
        let amounts = &self.config.amounts;
        let (min, max) = self
            .config
            .segment_profile(segment)
            .map_or((amounts.floor, amounts.ceiling), |p| (p.value_min, p.value_max));

        let raw = self.rng.pareto(1.0, amounts.pareto_alpha) - 1.0;
        let value = raw * (max - min) + min;
        let noisy = value * self.rng.uniform(amounts.noise_min, amounts.noise_max);
        round_cents(noisy.clamp(amounts.floor, amounts.ceiling))
    }

    pub fn sample_destination(&mut self) -> CountryName {
        self.rng
            .pick_weighted(&self.config.destinations, |d| d.weight)
            .map(|d| d.country.clone())
            .unwrap_or_default()
    }

    /// One-shot draw from the bucket matching the order's age.
    pub fn sample_status(&mut self, order_date: NaiveDate) -> OrderStatus {
        let days_old = self.clock.days_since(order_date);
        self.config
            .status_bucket(days_old)
            .and_then(|bucket| self.rng.pick_weighted(&bucket.outcomes, |o| o.weight))
            .map(|o| o.status)
            .unwrap_or(OrderStatus::Pending)
    }

    pub fn sample_payment_method(&mut self, country: &str) -> PaymentMethod {
        self.rng
            .pick_weighted(self.config.payment_table(country), |p| p.weight)
            .map(|p| p.method)
            .unwrap_or(PaymentMethod::Other)
    }

    pub fn next_order(&mut self, addresses: &mut ShippingAddresses) -> SeedResult<OrderRecord> {
        let customer_id = self.select_customer();
        let created_at = self.sample_order_datetime();
        let total = self.sample_total(self.segments.segment_of(customer_id));
        let country = self.sample_destination();
        let shipping_address = addresses.resolve(&country);
        let payment_method = self.sample_payment_method(&country);
        let order_date = created_at.date();
        let status = self.sample_status(order_date);
        let order_id = self.order_ids.allocate(&mut self.rng)?;

        Ok(OrderRecord {
            order_id,
            customer_id,
            order_date,
            total,
            status,
            shipping_address,
            payment_method,
            created_at,
        })
    }

    /// Lazily emit `count` orders so callers can flush at their own cadence.
    pub fn orders<'s>(
        &'s mut self,
        count: usize,
        addresses: &'s mut ShippingAddresses,
    ) -> impl Iterator<Item = SeedResult<OrderRecord>> + 's {
        (0..count).map(move |_| self.next_order(addresses))
    }
}

fn day_weight(dates: &DateModel, day: NaiveDate) -> f64 {
    let seasonal = dates.seasonal_multipliers[day.month0() as usize];
    match day.weekday() {
        Weekday::Sat | Weekday::Sun => seasonal * dates.weekend_penalty,
        _ => seasonal,
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::LocalAddressSynthesizer;
    use crate::rng::{RngBank, StreamSlot};
    use chrono::Timelike;

    fn clock() -> RunClock {
        RunClock::fixed(
            NaiveDate::from_ymd_opt(2025, 1, 15)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
        )
    }

    fn simulator_at(config: GeneratorConfig, clock: RunClock, seed: u64) -> OrderSimulator {
        let ids: Vec<CustomerId> = (1..=100).collect();
        let bank = RngBank::new(seed);
        let mut segment_rng = bank.for_stream(StreamSlot::Segments);
        let segments = SegmentAssigner::assign(&ids, &config.segments, &mut segment_rng);
        OrderSimulator::new(config, clock, ids, segments, bank.for_stream(StreamSlot::Orders))
            .unwrap()
    }

    fn simulator_with(config: GeneratorConfig, seed: u64) -> OrderSimulator {
        simulator_at(config, clock(), seed)
    }

    fn simulator(seed: u64) -> OrderSimulator {
        simulator_with(GeneratorConfig::standard(), seed)
    }

    #[test]
    fn empty_pool_is_an_error() {
        let config = GeneratorConfig::standard();
        let mut rng = RngBank::new(1).for_stream(StreamSlot::Segments);
        let segments = SegmentAssigner::assign(&[], &config.segments, &mut rng);
        let result = OrderSimulator::new(
            config,
            clock(),
            vec![],
            segments,
            RngBank::new(1).for_stream(StreamSlot::Orders),
        );
        assert!(matches!(result, Err(SeedError::EmptyCustomerPool)));
    }

    #[test]
    fn vip_customers_own_more_orders() {
        let config = GeneratorConfig::standard();
        let segments = SegmentAssigner::from_assignments([(1, Segment::Vip), (2, Segment::Inactive)]);
        let mut sim = OrderSimulator::new(
            config,
            clock(),
            vec![1, 2],
            segments,
            RngBank::new(3).for_stream(StreamSlot::Orders),
        )
        .unwrap();

        let vip = (0..10_000).filter(|_| sim.select_customer() == 1).count();
        // 5.0 / (5.0 + 0.05) ≈ 0.99
        assert!(vip > 9_800, "vip draws: {vip}");
    }

    #[test]
    fn dates_stay_inside_the_lookback_window() {
        let mut sim = simulator(11);
        let now = clock().now();
        for _ in 0..5_000 {
            let at = sim.sample_order_datetime();
            assert!(at <= now);
            assert!(now - at <= Duration::days(730), "{at}");
        }
    }

    #[test]
    fn december_is_busier_than_february() {
        let mut sim = simulator(12);
        let mut dec = 0;
        let mut feb = 0;
        for _ in 0..20_000 {
            match sim.sample_order_datetime().month() {
                12 => dec += 1,
                2 => feb += 1,
                _ => {}
            }
        }
        assert!(dec as f64 > feb as f64 * 1.5, "dec={dec} feb={feb}");
    }

    #[test]
    fn rejected_dates_fall_back_to_flat_offsets() {
        let mut config = GeneratorConfig::standard();
        config.dates.acceptance_divisor = f64::MAX;
        let mut sim = simulator_with(config, 13);
        for _ in 0..100 {
            let at = sim.sample_order_datetime();
            // No time-of-day skew on the fallback path: it keeps now's time.
            assert_eq!((at.hour(), at.minute(), at.second()), (10, 30, 0));
        }
    }

    #[test]
    fn accepted_times_follow_bands_and_weekend_penalty() {
        // Fallback draws keep now's time of day, which no band can reach
        // except by a 23:59:59 night draw, so they are easy to set apart.
        let late = NaiveDate::from_ymd_opt(2025, 6, 11)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let mut sim = simulator_at(GeneratorConfig::standard(), RunClock::fixed(late), 21);

        let (mut business, mut evening, mut night, mut weekend, mut accepted) = (0, 0, 0, 0, 0);
        for _ in 0..60_000 {
            let at = sim.sample_order_datetime();
            if at.time() == late.time() {
                continue;
            }
            accepted += 1;
            match at.hour() {
                9..=16 => business += 1,
                17..=21 => evening += 1,
                _ => night += 1,
            }
            if matches!(at.weekday(), Weekday::Sat | Weekday::Sun) {
                weekend += 1;
            }
        }
        assert!(accepted > 55_000, "only {accepted} accepted draws");

        let share = |n: usize| n as f64 / accepted as f64;
        assert!((0.68..=0.72).contains(&share(business)), "business {}", share(business));
        assert!((0.18..=0.22).contains(&share(evening)), "evening {}", share(evening));
        assert!((0.08..=0.12).contains(&share(night)), "night {}", share(night));
        // 2 weekend days at 0.7 against 5 weekdays: about 0.22, not 2/7.
        assert!((0.20..=0.24).contains(&share(weekend)), "weekend {}", share(weekend));
    }

    #[test]
    fn totals_are_bounded_and_rounded_for_every_segment() {
        let mut sim = simulator(14);
        for segment in Segment::ALL {
            for _ in 0..2_000 {
                let total = sim.sample_total(segment);
                assert!((5.0..=5000.0).contains(&total), "{segment}: {total}");
                let cents = total * 100.0;
                assert!((cents - cents.round()).abs() < 1e-6, "{total}");
            }
        }
    }

    #[test]
    fn month_old_orders_are_terminal() {
        let mut sim = simulator(15);
        let date = clock().today() - Duration::days(30);
        for _ in 0..1_000 {
            assert!(sim.sample_status(date).is_terminal());
        }
    }

    #[test]
    fn todays_orders_are_pending_or_processing() {
        let mut sim = simulator(16);
        for _ in 0..1_000 {
            let status = sim.sample_status(clock().today());
            assert!(matches!(status, OrderStatus::Pending | OrderStatus::Processing));
        }
    }

    #[test]
    fn japan_can_pay_cash_but_germany_cannot() {
        let mut sim = simulator(17);
        let japan: Vec<_> = (0..2_000).map(|_| sim.sample_payment_method("Japan")).collect();
        let germany: Vec<_> = (0..2_000).map(|_| sim.sample_payment_method("Germany")).collect();
        assert!(japan.contains(&PaymentMethod::Cash));
        assert!(!germany.contains(&PaymentMethod::Cash));
        assert!(germany.contains(&PaymentMethod::BankTransfer));
    }

    #[test]
    fn orders_reference_pool_customers() {
        let mut sim = simulator(18);
        let mut addresses = ShippingAddresses::local_only(
            LocalAddressSynthesizer::standard(),
            RngBank::new(18).for_stream(StreamSlot::Addresses),
        );
        let orders: Vec<OrderRecord> = sim.orders(200, &mut addresses).collect::<SeedResult<_>>().unwrap();
        assert_eq!(orders.len(), 200);
        for order in &orders {
            assert!((1..=100).contains(&order.customer_id));
            assert_eq!(order.created_at.date(), order.order_date);
            assert!(!order.shipping_address.is_empty());
        }
    }
}
