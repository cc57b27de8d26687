//! Unique identifier allocation by rejection sampling.
//!
//! Ids are drawn uniformly from a configured range and rejected if already
//! used in this run. This is collision avoidance, not a sequence: callers
//! must never assume ids are monotonic.

use crate::{
    config::IdRange,
    error::{SeedError, SeedResult},
    retry::retry_or_err,
    rng::StreamRng,
};
use std::collections::HashSet;

pub struct IdAllocator {
    kind: &'static str,
    range: IdRange,
    max_attempts: usize,
    used: HashSet<i64>,
}

impl IdAllocator {
    pub fn new(kind: &'static str, range: IdRange, max_attempts: usize) -> Self {
        Self {
            kind,
            range,
            max_attempts,
            used: HashSet::new(),
        }
    }

    /// Fail fast when a run asks for more ids than the range can hold.
    pub fn ensure_capacity(&self, additional: usize) -> SeedResult<()> {
        let needed = (self.used.len() + additional) as u64;
        if needed > self.range.capacity() {
            return Err(self.exhausted(0));
        }
        Ok(())
    }

    /// Draw a fresh id, resampling on collision up to the attempt guard.
    pub fn allocate(&mut self, rng: &mut StreamRng) -> SeedResult<i64> {
        let range = self.range;
        let used = &self.used;
        let id = retry_or_err(
            rng,
            self.max_attempts,
            |rng| {
                let candidate = rng.int_inclusive(range.min, range.max);
                (!used.contains(&candidate)).then_some(candidate)
            },
            || self.exhausted(self.max_attempts),
        )?;
        self.used.insert(id);
        Ok(id)
    }

    /// Treat ids that already exist in the store as taken.
    pub fn mark_used(&mut self, ids: impl IntoIterator<Item = i64>) {
        self.used.extend(ids);
    }

    pub fn is_used(&self, id: i64) -> bool {
        self.used.contains(&id)
    }

    pub fn allocated(&self) -> usize {
        self.used.len()
    }

    fn exhausted(&self, attempts: usize) -> SeedError {
        SeedError::IdSpaceExhausted {
            kind: self.kind,
            attempts,
            allocated: self.used.len(),
            capacity: self.range.capacity(),
        }
    }
}

/// Uniqueness guard for arbitrary string keys (customer emails).
pub struct UniqueKeys {
    kind: &'static str,
    max_attempts: usize,
    used: HashSet<String>,
}

impl UniqueKeys {
    pub fn new(kind: &'static str, max_attempts: usize) -> Self {
        Self {
            kind,
            max_attempts,
            used: HashSet::new(),
        }
    }

    pub fn mark_used(&mut self, keys: impl IntoIterator<Item = String>) {
        self.used.extend(keys);
    }

    /// Generate candidates until one is unseen.
    pub fn claim(
        &mut self,
        rng: &mut StreamRng,
        mut candidate: impl FnMut(&mut StreamRng) -> String,
    ) -> SeedResult<String> {
        let used = &self.used;
        let kind = self.kind;
        let max_attempts = self.max_attempts;
        let key = retry_or_err(
            rng,
            max_attempts,
            |rng| {
                let key = candidate(rng);
                (!used.contains(&key)).then_some(key)
            },
            || SeedError::KeySpaceExhausted {
                kind,
                attempts: max_attempts,
                claimed: used.len(),
            },
        )?;
        self.used.insert(key.clone());
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, StreamSlot};

    #[test]
    fn allocates_unique_ids_within_range() {
        let range = IdRange { min: 10, max: 60 };
        let mut ids = IdAllocator::new("test", range, 10_000);
        let mut rng = RngBank::new(9).for_stream(StreamSlot::Customers);
        let mut seen = HashSet::new();
        for _ in 0..51 {
            let id = ids.allocate(&mut rng).unwrap();
            assert!(range.contains(id));
            assert!(seen.insert(id), "duplicate id {id}");
        }
        assert_eq!(ids.allocated(), 51);
    }

    #[test]
    fn full_range_reports_exhaustion() {
        let mut ids = IdAllocator::new("test", IdRange { min: 1, max: 3 }, 50);
        let mut rng = RngBank::new(9).for_stream(StreamSlot::Customers);
        for _ in 0..3 {
            ids.allocate(&mut rng).unwrap();
        }
        let err = ids.allocate(&mut rng).unwrap_err();
        assert!(matches!(err, SeedError::IdSpaceExhausted { kind: "test", attempts: 50, .. }));
    }

    #[test]
    fn capacity_check_rejects_oversized_requests() {
        let ids = IdAllocator::new("test", IdRange { min: 1, max: 100 }, 50);
        assert!(ids.ensure_capacity(100).is_ok());
        assert!(ids.ensure_capacity(101).is_err());
    }

    #[test]
    fn unique_keys_retry_past_collisions() {
        let mut keys = UniqueKeys::new("email", 100);
        let mut rng = RngBank::new(2).for_stream(StreamSlot::Customers);
        let first = keys
            .claim(&mut rng, |rng| format!("k{}", rng.next_u64_below(2)))
            .unwrap();
        let second = keys
            .claim(&mut rng, |rng| format!("k{}", rng.next_u64_below(2)))
            .unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn exhausted_keys_report_claimed_count() {
        let mut keys = UniqueKeys::new("email", 20);
        let mut rng = RngBank::new(3).for_stream(StreamSlot::Customers);
        keys.claim(&mut rng, |_| "same@example.com".to_string()).unwrap();
        let err = keys
            .claim(&mut rng, |_| "same@example.com".to_string())
            .unwrap_err();
        assert!(matches!(
            err,
            SeedError::KeySpaceExhausted { kind: "email", attempts: 20, claimed: 1 }
        ));
        assert!(!err.to_string().contains("range holds"), "{err}");
    }

    #[test]
    fn marked_ids_are_never_reissued() {
        let mut ids = IdAllocator::new("test", IdRange { min: 1, max: 4 }, 10_000);
        ids.mark_used([1, 2, 3]);
        assert!(ids.is_used(2));
        assert!(!ids.is_used(4));
        let mut rng = RngBank::new(5).for_stream(StreamSlot::Orders);
        assert_eq!(ids.allocate(&mut rng).unwrap(), 4);
        assert!(ids.is_used(4));
        assert!(ids.ensure_capacity(1).is_err());
    }
}
