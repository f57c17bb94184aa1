//! Date bucketization: collapse an arbitrary-length date range into a fixed
//! number of representative day ranks, plus the labels the dashboard selector
//! shows for them.

use crate::model::Post;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

/// Number of representative sampling points taken from the date range.
pub const BUCKET_COUNT: usize = 6;

/// Selector label for the unfiltered series, appended after the date labels.
pub const FULL_DATASET_LABEL: &str = "Full dataset";

/// Injective mapping from each distinct calendar date present in the dataset
/// to a dense 1-based chronological rank. Built once per run, then read-only.
#[derive(Debug, Clone)]
pub struct DayIndex {
    ranks: BTreeMap<NaiveDate, u32>,
}

impl DayIndex {
    pub fn build(posts: &[Post]) -> Self {
        Self::from_dates(posts.iter().map(|p| p.created.date()))
    }

    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        // BTreeMap keys are already deduplicated and ascending; ranks follow
        // insertion order of the sorted keys.
        let distinct: std::collections::BTreeSet<NaiveDate> = dates.into_iter().collect();
        let ranks = distinct.into_iter().zip(1u32..).collect();
        Self { ranks }
    }

    /// Number of distinct dates.
    pub fn len(&self) -> u32 {
        self.ranks.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn rank(&self, date: NaiveDate) -> Option<u32> {
        self.ranks.get(&date).copied()
    }

    pub fn date_of(&self, rank: u32) -> Option<NaiveDate> {
        self.ranks
            .iter()
            .find(|(_, r)| **r == rank)
            .map(|(date, _)| *date)
    }

    /// Rank → `%d.%m` map used for time-axis tick labels in summary charts.
    pub fn tick_labels(&self) -> BTreeMap<u32, String> {
        self.ranks
            .iter()
            .map(|(date, rank)| (*rank, date.format("%d.%m").to_string()))
            .collect()
    }
}

/// Tag every post with its day rank and a normalized display timestamp.
///
/// Must run before any aggregation: the orchestrator assumes every post
/// carries a valid rank.
pub fn tag_posts(posts: &mut [Post], index: &DayIndex) {
    for post in posts.iter_mut() {
        post.day_rank = index.rank(post.created.date());
        post.created_display = post.created.format("%Y-%m-%d %H:%M:%S").to_string();
    }
}

/// Choose [`BUCKET_COUNT`] evenly spaced day ranks across `[1, N]` by linear
/// interpolation with round-to-nearest at every point.
///
/// With fewer than six distinct dates the selection repeats boundary ranks;
/// downstream consumers tolerate duplicate buckets with identical content.
pub fn select_buckets(index: &DayIndex) -> [u32; BUCKET_COUNT] {
    let n = index.len().max(1);
    let span = (n - 1) as f64;
    let mut selection = [1u32; BUCKET_COUNT];
    for (i, slot) in selection.iter_mut().enumerate() {
        let value = 1.0 + span * i as f64 / (BUCKET_COUNT - 1) as f64;
        *slot = value.round() as u32;
    }
    debug!(distinct_days = n, selection = ?selection, "selected day buckets");
    selection
}

/// Human-readable `%d.%m.%Y` label per selected rank, plus the trailing
/// [`FULL_DATASET_LABEL`] sentinel. Always `BUCKET_COUNT + 1` entries.
pub fn selection_labels(index: &DayIndex, selection: &[u32; BUCKET_COUNT]) -> Vec<String> {
    let mut labels: Vec<String> = selection
        .iter()
        .map(|&rank| {
            index
                .date_of(rank)
                .map(|d| d.format("%d.%m.%Y").to_string())
                .unwrap_or_default()
        })
        .collect();
    labels.push(FULL_DATASET_LABEL.to_string());
    labels
}
