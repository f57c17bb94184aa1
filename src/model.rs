use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One row as read from the posts table, before any cleanup.
#[derive(Debug, Clone)]
pub struct RawPost {
    pub id: String,
    pub created: String,
    pub user_name: String,
    /// Free-form location string as the user typed it. May be blank.
    pub user_location: String,
    pub text: String,
    pub repost_count: i64,
    pub follower_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One enriched post: cleaned text, resolved location, sentiment scores.
///
/// `day_rank` and `created_display` start empty and are written by the date
/// bucketizer; everything downstream of it may assume they are set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub created: NaiveDateTime,
    /// Normalized `%Y-%m-%d %H:%M:%S` form of `created`, for hover display.
    pub created_display: String,
    pub user_name: String,
    /// Canonical city name (first comma segment, uppercased). None when the
    /// raw location was blank.
    pub location_key: Option<String>,
    /// Present only when `location_key` resolved against the city reference.
    pub coordinates: Option<Coordinates>,
    /// Sentiment polarity in [-1, 1], computed upstream of the core.
    pub polarity: f64,
    /// Sentiment subjectivity in [0, 1], computed upstream of the core.
    pub subjectivity: f64,
    pub text: String,
    /// Dense 1-based rank of this post's calendar date, set by the bucketizer.
    pub day_rank: Option<u32>,
}

impl Post {
    /// True when this post participates in density tallies: it needs both a
    /// canonical city and resolved coordinates.
    pub fn has_geo(&self) -> bool {
        self.location_key.is_some() && self.coordinates.is_some()
    }
}
