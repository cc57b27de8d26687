//! Behavioural customer segments.
//!
//! Every customer receives exactly one segment per run, drawn once from
//! the configured weight table and never reassigned. The simulator reads
//! the assignment to skew order frequency and spend.

use crate::{config::SegmentProfile, rng::StreamRng, types::CustomerId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Segment {
    Vip,
    Regular,
    New,
    Inactive,
}

impl Segment {
    pub const ALL: [Segment; 4] = [Segment::Vip, Segment::Regular, Segment::New, Segment::Inactive];

    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Vip => "VIP",
            Segment::Regular => "REGULAR",
            Segment::New => "NEW",
            Segment::Inactive => "INACTIVE",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable customer → segment map built by a single assignment pass.
#[derive(Debug, Clone)]
pub struct SegmentAssigner {
    assignments: HashMap<CustomerId, Segment>,
}

impl SegmentAssigner {
    /// Draw one segment per customer, independently, by profile weight.
    pub fn assign(customer_ids: &[CustomerId], profiles: &[SegmentProfile], rng: &mut StreamRng) -> Self {
        let assignments = customer_ids
            .iter()
            .map(|id| {
                let segment = rng
                    .pick_weighted(profiles, |p| p.weight)
                    .map(|p| p.segment)
                    .unwrap_or(Segment::Regular);
                (*id, segment)
            })
            .collect();
        Self { assignments }
    }

    /// Build from explicit pairs (fixtures, replays of a stored run).
    pub fn from_assignments(pairs: impl IntoIterator<Item = (CustomerId, Segment)>) -> Self {
        Self {
            assignments: pairs.into_iter().collect(),
        }
    }

    /// Segment of a customer. Unassigned ids read as REGULAR.
    pub fn segment_of(&self, customer_id: CustomerId) -> Segment {
        self.assignments
            .get(&customer_id)
            .copied()
            .unwrap_or(Segment::Regular)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Number of customers per segment, in segment order.
    pub fn counts(&self) -> BTreeMap<Segment, usize> {
        let mut counts = BTreeMap::new();
        for segment in self.assignments.values() {
            *counts.entry(*segment).or_insert(0) += 1;
        }
        counts
    }
}
