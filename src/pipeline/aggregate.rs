//! Aggregation orchestration: drives the bucketizer selection and the density
//! normalizer over each selected bucket and over the full dataset, keeping the
//! bucket-scoped and dataset-scoped normalization ceilings strictly separate.

use super::density::{self, CityAggregate};
use super::timeline::{self, DayIndex, BUCKET_COUNT, FULL_DATASET_LABEL};
use crate::model::Post;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Columnar sentiment data for one selection entry, shaped for direct
/// consumption by the scatter plot (parallel vectors).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentimentSeries {
    pub polarity: Vec<f64>,
    pub subjectivity: Vec<f64>,
    pub users: Vec<String>,
    pub created: Vec<String>,
    pub locations: Vec<String>,
    pub texts: Vec<String>,
}

impl SentimentSeries {
    pub fn len(&self) -> usize {
        self.polarity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polarity.is_empty()
    }

    fn push(&mut self, post: &Post) {
        self.polarity.push(post.polarity);
        self.subjectivity.push(post.subjectivity);
        self.users.push(post.user_name.clone());
        self.created.push(post.created_display.clone());
        self.locations
            .push(display_city(post.location_key.as_deref().unwrap_or("")));
        self.texts.push(post.text.clone());
    }
}

/// Everything the dashboard needs for one selector entry: either one of the
/// six chronological buckets (`day_rank` set) or the full dataset (last entry,
/// `day_rank` absent).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketSeries {
    pub label: String,
    pub day_rank: Option<u32>,
    pub sentiment: SentimentSeries,
    pub density: CityAggregate,
}

/// Mean ± standard deviation of one sentiment metric over a single day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySummary {
    pub day_rank: u32,
    pub tick: String,
    pub mean: f64,
    pub std: f64,
}

/// Geotagged post count of a single day, for the count-over-time chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyCount {
    pub day_rank: u32,
    pub tick: String,
    pub count: u64,
}

/// Complete output of one aggregation run, keyed by selection label so the
/// presentation layer does a single lookup per selector change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedSeries {
    /// The six chronological date labels plus the trailing sentinel.
    pub labels: Vec<String>,
    /// Six bucket series in selection order, then the full-dataset series.
    pub buckets: Vec<BucketSeries>,
    pub polarity_summary: Vec<DaySummary>,
    pub subjectivity_summary: Vec<DaySummary>,
    pub daily_counts: Vec<DailyCount>,
}

impl AggregatedSeries {
    /// Series for one selector label. The full-dataset sentinel resolves like
    /// any other label; duplicate date labels resolve to their first
    /// occurrence (identical content by construction).
    pub fn by_label(&self, label: &str) -> Option<&BucketSeries> {
        self.buckets.iter().find(|b| b.label == label)
    }

    pub fn full_dataset(&self) -> Option<&BucketSeries> {
        self.by_label(FULL_DATASET_LABEL)
    }
}

/// Display form of a canonical uppercased city key ("BAD HOMBURG" → "Bad
/// Homburg").
fn display_city(key: &str) -> String {
    key.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Sample standard deviation; 0 for fewer than two values.
fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Per-day mean ± std of one sentiment metric, skipping exact zeros (unscored
/// or perfectly neutral posts would otherwise drown the trend).
fn summarize_metric(
    posts: &[Post],
    index: &DayIndex,
    metric: impl Fn(&Post) -> f64,
) -> Vec<DaySummary> {
    let ticks = index.tick_labels();
    (1..=index.len())
        .filter_map(|rank| {
            let values: Vec<f64> = posts
                .iter()
                .filter(|p| p.day_rank == Some(rank))
                .map(&metric)
                .filter(|v| *v != 0.0)
                .collect();
            if values.is_empty() {
                return None;
            }
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            Some(DaySummary {
                day_rank: rank,
                tick: ticks.get(&rank).cloned().unwrap_or_default(),
                mean,
                std: std_dev(&values, mean),
            })
        })
        .collect()
}

/// Geotagged post count per day over the whole date range.
fn daily_counts(posts: &[Post], index: &DayIndex) -> Vec<DailyCount> {
    let ticks = index.tick_labels();
    (1..=index.len())
        .map(|rank| {
            let count = posts
                .iter()
                .filter(|p| p.day_rank == Some(rank) && p.has_geo())
                .count() as u64;
            DailyCount {
                day_rank: rank,
                tick: ticks.get(&rank).cloned().unwrap_or_default(),
                count,
            }
        })
        .collect()
}

/// Run the two-pass aggregation over pre-tagged posts.
///
/// Pass one establishes the normalization ceilings: the maximum city
/// log-count across the six selected buckets, and separately the maximum over
/// the unfiltered dataset. Pass two bins each bucket against the bucket-scope
/// ceiling and the full dataset against its own. The two scopes must never be
/// conflated.
pub fn aggregate(posts: &[Post], index: &DayIndex) -> AggregatedSeries {
    let selection = timeline::select_buckets(index);
    let labels = timeline::selection_labels(index, &selection);

    let partitions: Vec<Vec<&Post>> = selection
        .iter()
        .map(|&rank| {
            posts
                .iter()
                .filter(|p| p.day_rank == Some(rank))
                .collect::<Vec<_>>()
        })
        .collect();

    // Pass 1: normalization ceilings, bucket scope and dataset scope.
    let bucket_scope_max = partitions
        .iter()
        .filter_map(|partition| density::max_log_count(partition.iter().copied()))
        .fold(None::<f64>, |acc, v| Some(acc.map_or(v, |m| m.max(v))))
        .unwrap_or_else(|| {
            warn!("no geotagged posts in any selected bucket");
            0.0
        });
    let full_scope_max = density::max_log_count(posts).unwrap_or(0.0);
    debug!(bucket_scope_max, full_scope_max, "normalization ceilings");

    // Pass 2: one aggregate per bucket, chronological order, then the
    // full-dataset aggregate last and never mixed into the ordering.
    let mut buckets: Vec<BucketSeries> = Vec::with_capacity(BUCKET_COUNT + 1);
    for (i, (&rank, partition)) in selection.iter().zip(&partitions).enumerate() {
        let mut sentiment = SentimentSeries::default();
        for &post in partition.iter() {
            sentiment.push(post);
        }
        let density = density::aggregate_partition(partition.iter().copied(), bucket_scope_max);
        if density.is_empty() {
            warn!(rank, label = %labels[i], "bucket has zero density, kept in selection");
        }
        buckets.push(BucketSeries {
            label: labels[i].clone(),
            day_rank: Some(rank),
            sentiment,
            density,
        });
    }

    let mut full_sentiment = SentimentSeries::default();
    for post in posts {
        full_sentiment.push(post);
    }
    buckets.push(BucketSeries {
        label: FULL_DATASET_LABEL.to_string(),
        day_rank: None,
        sentiment: full_sentiment,
        density: density::aggregate_partition(posts, full_scope_max),
    });

    info!(
        distinct_days = index.len(),
        posts = posts.len(),
        "aggregated {} bucket series + full dataset",
        BUCKET_COUNT
    );

    AggregatedSeries {
        labels,
        buckets,
        polarity_summary: summarize_metric(posts, index, |p| p.polarity),
        subjectivity_summary: summarize_metric(posts, index, |p| p.subjectivity),
        daily_counts: daily_counts(posts, index),
    }
}
