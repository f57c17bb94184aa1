use chrono::NaiveDate;
use geopulse::model::{Coordinates, Post};
use geopulse::pipeline::{self, aggregate, timeline, BUCKET_COUNT, FULL_DATASET_LABEL};

const BERLIN: (&str, f64, f64) = ("BERLIN", 52.52, 13.405);
const HAMBURG: (&str, f64, f64) = ("HAMBURG", 53.55, 9.993);
const MUENCHEN: (&str, f64, f64) = ("MUENCHEN", 48.137, 11.575);

fn post(day: u32, hour: u32, city: (&str, f64, f64)) -> Post {
    Post {
        created: NaiveDate::from_ymd_opt(2020, 5, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap(),
        created_display: String::new(),
        user_name: format!("user{hour}"),
        location_key: Some(city.0.to_string()),
        coordinates: Some(Coordinates {
            latitude: city.1,
            longitude: city.2,
        }),
        polarity: 0.3,
        subjectivity: 0.5,
        text: "text".into(),
        day_rank: None,
    }
}

/// Six days, ten posts per day split 5/3/2 across three cities.
fn scenario_posts() -> Vec<Post> {
    let mut posts = Vec::new();
    for day in 1..=6 {
        for hour in 0..5 {
            posts.push(post(day, hour, BERLIN));
        }
        for hour in 5..8 {
            posts.push(post(day, hour, HAMBURG));
        }
        for hour in 8..10 {
            posts.push(post(day, hour, MUENCHEN));
        }
    }
    posts
}

fn aggregated() -> pipeline::AggregatedSeries {
    let mut posts = scenario_posts();
    let index = timeline::DayIndex::build(&posts);
    timeline::tag_posts(&mut posts, &index);
    aggregate::aggregate(&posts, &index)
}

#[test]
fn six_day_scenario_selects_every_day_with_expected_labels() {
    let series = aggregated();

    assert_eq!(
        series.labels,
        vec![
            "01.05.2020",
            "02.05.2020",
            "03.05.2020",
            "04.05.2020",
            "05.05.2020",
            "06.05.2020",
            FULL_DATASET_LABEL,
        ]
    );

    let ranks: Vec<_> = series.buckets.iter().filter_map(|b| b.day_rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(series.buckets.len(), BUCKET_COUNT + 1);
}

#[test]
fn bucket_bins_normalize_against_the_bucket_scope_ceiling() {
    let series = aggregated();

    // Global ceiling across buckets is ln(5); with ten equal-width bins the
    // count-5 city tops out, ln(3)/ln(5)*10 ≈ 6.8 → bin 7, ln(2)/ln(5)*10 ≈
    // 4.3 → bin 5.
    for bucket in series.buckets.iter().filter(|b| b.day_rank.is_some()) {
        let cities = &bucket.density.cities;
        assert_eq!(cities["BERLIN"].count, 5);
        assert!((cities["BERLIN"].log_count - 5.0_f64.ln()).abs() < 1e-12);
        assert_eq!(cities["BERLIN"].bin, 10);

        assert_eq!(cities["HAMBURG"].count, 3);
        assert_eq!(cities["HAMBURG"].bin, 7);

        assert_eq!(cities["MUENCHEN"].count, 2);
        assert_eq!(cities["MUENCHEN"].bin, 5);
        assert!((cities["MUENCHEN"].radius - 5.0 / 20.0).abs() < 1e-12);

        assert_eq!(bucket.density.total_count(), 10);
        assert_eq!(bucket.sentiment.len(), 10);
    }
}

#[test]
fn full_dataset_normalizes_against_its_own_ceiling() {
    let series = aggregated();
    let full = series.full_dataset().expect("full dataset series");

    let cities = &full.density.cities;
    assert_eq!(cities["BERLIN"].count, 30);
    assert_eq!(cities["HAMBURG"].count, 18);
    assert_eq!(cities["MUENCHEN"].count, 12);

    // Ceiling here is ln(30), independent of the bucket scope:
    // ln(18)/ln(30)*10 ≈ 8.5 → bin 9, ln(12)/ln(30)*10 ≈ 7.3 → bin 8.
    assert_eq!(cities["BERLIN"].bin, 10);
    assert_eq!(cities["HAMBURG"].bin, 9);
    assert_eq!(cities["MUENCHEN"].bin, 8);

    assert_eq!(full.sentiment.len(), 60);
    assert!(full.day_rank.is_none());
}

#[test]
fn daily_counts_cover_the_whole_range() {
    let series = aggregated();
    let counts: Vec<_> = series.daily_counts.iter().map(|d| d.count).collect();
    assert_eq!(counts, vec![10; 6]);
    assert_eq!(series.daily_counts[0].tick, "01.05");
}

#[test]
fn label_lookup_is_generic_over_selection_entries() {
    let series = aggregated();
    for label in &series.labels {
        assert!(
            series.by_label(label).is_some(),
            "label {label} must resolve to a series"
        );
    }
}
