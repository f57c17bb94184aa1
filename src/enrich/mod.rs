//! Record enrichment: timestamp validation, text cleanup, location
//! canonicalization, geography join, and sentiment scoring. Everything the
//! aggregation core needs in place before bucketizing starts.

pub mod sentiment;
pub mod text;

use crate::error::{Error, Result};
use crate::geo::CityIndex;
use crate::model::{Post, RawPost};
use chrono::{DateTime, NaiveDateTime};
use sentiment::SentimentScorer;
use tracing::debug;

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a stored timestamp. Accepts the capture format, its `T`-separated
/// variant, and RFC 3339. A post with an unparseable timestamp is a contract
/// violation of the upstream store and fails the run loudly rather than being
/// dropped silently.
fn parse_created(value: &str) -> Result<NaiveDateTime> {
    for format in TIMESTAMP_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.naive_utc());
    }
    Err(Error::invalid_timestamp(
        value,
        "matches no accepted format",
    ))
}

/// Turn raw capture rows into enriched posts. Posts whose location misses the
/// city reference keep `coordinates: None` and stay in the collection for the
/// sentiment-only series.
pub fn enrich_posts(
    raw: Vec<RawPost>,
    cities: &CityIndex,
    scorer: &impl SentimentScorer,
) -> Result<Vec<Post>> {
    let mut posts = Vec::with_capacity(raw.len());
    let mut unresolved = 0usize;

    for row in raw {
        let created = parse_created(&row.created)?;
        let location_key = text::normalize_location(&row.user_location);
        let coordinates = location_key.as_deref().and_then(|key| cities.lookup(key));
        if location_key.is_some() && coordinates.is_none() {
            unresolved += 1;
        }

        let cleaned = text::clean_text(&row.text);
        let score = scorer.score(&cleaned);

        posts.push(Post {
            created,
            created_display: String::new(),
            user_name: row.user_name,
            location_key,
            coordinates,
            polarity: score.polarity,
            subjectivity: score.subjectivity,
            text: cleaned,
            day_rank: None,
        });
    }

    debug!(unresolved, "locations without a city reference match");
    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinates;
    use sentiment::LexiconScorer;

    fn raw(created: &str, location: &str, text: &str) -> RawPost {
        RawPost {
            id: "1".into(),
            created: created.into(),
            user_name: "user".into(),
            user_location: location.into(),
            text: text.into(),
            repost_count: 0,
            follower_count: 0,
        }
    }

    fn city_index() -> CityIndex {
        CityIndex::from_entries([(
            "BERLIN".to_string(),
            Coordinates {
                latitude: 52.52,
                longitude: 13.405,
            },
        )])
    }

    #[test]
    fn resolves_known_city() {
        let posts = enrich_posts(
            vec![raw("2020-05-01 10:00:00", "Berlin, Germany", "hello")],
            &city_index(),
            &LexiconScorer::new(),
        )
        .unwrap();
        assert_eq!(posts[0].location_key.as_deref(), Some("BERLIN"));
        assert!(posts[0].coordinates.is_some());
    }

    #[test]
    fn unknown_city_keeps_post_without_coordinates() {
        let posts = enrich_posts(
            vec![raw("2020-05-01 10:00:00", "Atlantis", "hello")],
            &city_index(),
            &LexiconScorer::new(),
        )
        .unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].location_key.as_deref(), Some("ATLANTIS"));
        assert!(posts[0].coordinates.is_none());
    }

    #[test]
    fn invalid_timestamp_fails_the_run() {
        let result = enrich_posts(
            vec![raw("yesterday-ish", "Berlin", "hello")],
            &city_index(),
            &LexiconScorer::new(),
        );
        assert!(matches!(
            result,
            Err(Error::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn rfc3339_timestamps_are_accepted() {
        let posts = enrich_posts(
            vec![raw("2020-05-01T10:00:00+02:00", "", "hello")],
            &city_index(),
            &LexiconScorer::new(),
        )
        .unwrap();
        assert_eq!(posts[0].created.format("%H").to_string(), "08");
    }

    #[test]
    fn text_is_cleaned_before_scoring() {
        let posts = enrich_posts(
            vec![raw("2020-05-01 10:00:00", "", "RT @x great https://e.com")],
            &city_index(),
            &LexiconScorer::new(),
        )
        .unwrap();
        assert_eq!(posts[0].text, "great");
        assert!(posts[0].polarity > 0.0);
    }
}
