use crate::config::{DashboardConfig, StyleConfig};
use crate::error::{Error, Result};
use crate::pipeline::AggregatedSeries;
use askama::Template;
use chrono::Utc;

#[derive(Template)]
#[template(path = "dashboard.html")]
struct Dashboard<'a> {
    title: &'a str,
    generated_at: String,
    font: &'a str,
    text_color: &'a str,
    accent_color: &'a str,
    highlight_color: &'a str,
    labels: Vec<String>,
    post_count: usize,
    city_count: usize,
    day_count: usize,
    series_json: String,
}

/// Render the self-contained dashboard HTML. All series data is embedded as
/// one JSON document; the selector script resolves a series by its label, so
/// the template never branches per bucket.
pub fn render_dashboard(
    series: &AggregatedSeries,
    dashboard: &DashboardConfig,
    style: &StyleConfig,
) -> Result<String> {
    let series_json = serde_json::to_string(series)
        .map_err(|e| Error::Template(format!("serialize series: {e}")))?;

    let full = series.full_dataset();
    let page = Dashboard {
        title: &dashboard.title,
        generated_at: Utc::now().format("%Y-%m-%d %H:%M UTC").to_string(),
        font: &style.font,
        text_color: &style.text_color,
        accent_color: &style.accent_color,
        highlight_color: &style.highlight_color,
        labels: series.labels.clone(),
        post_count: full.map_or(0, |b| b.sentiment.len()),
        city_count: full.map_or(0, |b| b.density.cities.len()),
        day_count: series.daily_counts.len(),
        series_json,
    };

    page.render()
        .map_err(|e| Error::Template(format!("render dashboard: {e}")))
}
