//! Per-city density normalization: counts, log magnitudes, and fixed-width
//! binning against a caller-supplied global ceiling so that bubble sizes stay
//! comparable across buckets and against the full dataset.

use crate::model::{Coordinates, Post};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Number of equal-width bins the `[0, global_max]` magnitude range is split
/// into.
pub const BIN_COUNT: u32 = 10;

/// Divisor converting a 1–10 ordinal bin into a rendering magnitude (bubble
/// radius). Callers depend on the pre-scaled value, so it is part of this
/// module's contract rather than a presentation detail.
pub const RADIUS_SCALE: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityStat {
    pub count: u64,
    pub coordinates: Coordinates,
    pub log_count: f64,
    /// Bin index in `1..=BIN_COUNT`.
    pub bin: u32,
    /// `bin / RADIUS_SCALE`, the magnitude handed to the presentation layer.
    pub radius: f64,
}

/// Density statistics for one partition (a bucket's worth of posts, or the
/// full dataset). Keyed by canonical city name; empty when the partition has
/// no geotagged posts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CityAggregate {
    pub cities: BTreeMap<String, CityStat>,
}

impl CityAggregate {
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Total geotagged posts covered by this aggregate.
    pub fn total_count(&self) -> u64 {
        self.cities.values().map(|c| c.count).sum()
    }
}

/// Count posts per city, keeping only posts with both a canonical city and
/// resolved coordinates. Returned pairs carry the coordinates so the caller
/// never re-resolves them.
pub fn city_counts<'a>(
    posts: impl IntoIterator<Item = &'a Post>,
) -> BTreeMap<String, (u64, Coordinates)> {
    let mut counts: BTreeMap<String, (u64, Coordinates)> = BTreeMap::new();
    for post in posts {
        let (Some(key), Some(coords)) = (&post.location_key, post.coordinates) else {
            continue;
        };
        counts
            .entry(key.clone())
            .and_modify(|(n, _)| *n += 1)
            .or_insert((1, coords));
    }
    counts
}

/// Maximum `ln(count)` over the cities of one partition. `None` when the
/// partition has no geotagged posts.
pub fn max_log_count<'a>(posts: impl IntoIterator<Item = &'a Post>) -> Option<f64> {
    city_counts(posts)
        .values()
        .map(|(count, _)| (*count as f64).ln())
        .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
}

/// Assign `log_count` to one of [`BIN_COUNT`] equal-width half-open intervals
/// over `[0, global_max]`, the last interval closed on both ends.
///
/// A `log_count` of exactly 0 lands in bin 1, and anything that cannot be
/// placed (degenerate `global_max`, value beyond the ceiling) falls back to
/// bin 1 rather than staying unassigned.
fn bin_for(log_count: f64, global_max: f64) -> u32 {
    if global_max <= 0.0 || !global_max.is_finite() {
        // Every city has count 1: no magnitude range to partition.
        return 1;
    }
    if log_count <= 0.0 {
        return 1;
    }
    if log_count >= global_max {
        return if log_count == global_max { BIN_COUNT } else { 1 };
    }
    (log_count / global_max * BIN_COUNT as f64).floor() as u32 + 1
}

/// Compute the [`CityAggregate`] for one partition against a pre-computed
/// global maximum magnitude. Pure function of its inputs.
///
/// An empty partition yields an empty aggregate, never an error; the
/// orchestrator records the condition and keeps the bucket in the selection.
pub fn aggregate_partition<'a>(
    posts: impl IntoIterator<Item = &'a Post>,
    global_max: f64,
) -> CityAggregate {
    let counts = city_counts(posts);
    if counts.is_empty() {
        warn!("partition has no geotagged posts, emitting empty aggregate");
        return CityAggregate::default();
    }

    let cities = counts
        .into_iter()
        .map(|(city, (count, coordinates))| {
            let log_count = (count as f64).ln();
            let bin = bin_for(log_count, global_max);
            let stat = CityStat {
                count,
                coordinates,
                log_count,
                bin,
                radius: bin as f64 / RADIUS_SCALE,
            };
            (city, stat)
        })
        .collect();

    CityAggregate { cities }
}
