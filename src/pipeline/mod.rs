//! The batch analytics pipeline: load → enrich → bucketize → aggregate.

pub mod aggregate;
pub mod density;
pub mod timeline;

pub use aggregate::{AggregatedSeries, BucketSeries, DailyCount, DaySummary, SentimentSeries};
pub use density::{CityAggregate, CityStat};
pub use timeline::{DayIndex, BUCKET_COUNT, FULL_DATASET_LABEL};

use crate::config::Config;
use crate::enrich;
use crate::error::Result;
use crate::geo::CityIndex;
use crate::store;
use tracing::info;

/// Run the full aggregation pipeline from config: read posts from the local
/// database, enrich them, and produce the label-keyed series the dashboard
/// consumes.
pub fn run(config: &Config) -> Result<AggregatedSeries> {
    let raw = store::load_posts(
        &config.database.path,
        config.database.exclude_date.as_deref(),
    )?;
    let cities = CityIndex::from_csv(&config.geography.cities_csv)?;
    let scorer = enrich::sentiment::LexiconScorer::new();
    let mut posts = enrich::enrich_posts(raw, &cities, &scorer)?;
    info!(
        posts = posts.len(),
        geotagged = posts.iter().filter(|p| p.has_geo()).count(),
        "enriched posts"
    );

    // Tag-then-aggregate: ranks must be in place before any partitioning.
    let index = DayIndex::build(&posts);
    timeline::tag_posts(&mut posts, &index);

    Ok(aggregate::aggregate(&posts, &index))
}
