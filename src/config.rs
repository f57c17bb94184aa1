use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub geography: GeographyConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub style: StyleConfig,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    /// Calendar date (`YYYY-MM-DD`) to drop entirely, e.g. a partial capture
    /// day at the end of a collection run.
    #[serde(default)]
    pub exclude_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeographyConfig {
    #[serde(default = "default_cities_csv")]
    pub cities_csv: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_title")]
    pub title: String,
}

/// Shared visual attributes for the rendered dashboard. Passed into the
/// template instead of living as module-level constants so a single config
/// edit restyles every chart.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default = "default_font")]
    pub font: String,
    #[serde(default = "default_text_color")]
    pub text_color: String,
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
    #[serde(default = "default_highlight_color")]
    pub highlight_color: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            exclude_date: None,
        }
    }
}

impl Default for GeographyConfig {
    fn default() -> Self {
        Self {
            cities_csv: default_cities_csv(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            title: default_title(),
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font: default_font(),
            text_color: default_text_color(),
            accent_color: default_accent_color(),
            highlight_color: default_highlight_color(),
        }
    }
}

// Defaults
fn default_db_path() -> PathBuf {
    std::env::var("GEOPULSE_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("geo_posts.db"))
}
fn default_cities_csv() -> PathBuf {
    PathBuf::from("resources/geodata_cities.csv")
}
fn default_output() -> PathBuf {
    PathBuf::from("docs/index.html")
}
fn default_title() -> String {
    "Geotagged Post Sentiment".into()
}
fn default_font() -> String {
    "Helvetica".into()
}
fn default_text_color() -> String {
    "#737373".into()
}
fn default_accent_color() -> String {
    "teal".into()
}
fn default_highlight_color() -> String {
    "#ff8096".into()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("failed to read config {}: {e}", path.display())))?;
        toml::from_str(&content).map_err(|e| Error::config(format!("failed to parse config: {e}")))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.database.path.exists() {
            return Err(Error::config(format!(
                "database {} not found. Set database.path in config.toml or GEOPULSE_DB",
                self.database.path.display()
            )));
        }
        if !self.geography.cities_csv.exists() {
            return Err(Error::config(format!(
                "city reference {} not found. Set geography.cities_csv in config.toml",
                self.geography.cities_csv.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_parses() {
        let toml = r##"
[database]
path = "data/posts.db"
exclude_date = "2020-05-06"

[geography]
cities_csv = "data/cities.csv"

[dashboard]
output = "out/index.html"
title = "Corona Sentiment"

[style]
font = "Verdana"
text_color = "#333333"
accent_color = "navy"
highlight_color = "coral"
"##;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.database.path, PathBuf::from("data/posts.db"));
        assert_eq!(config.database.exclude_date.as_deref(), Some("2020-05-06"));
        assert_eq!(config.dashboard.title, "Corona Sentiment");
        assert_eq!(config.style.font, "Verdana");
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.database.exclude_date.is_none());
        assert_eq!(config.dashboard.output, PathBuf::from("docs/index.html"));
        assert_eq!(config.style.font, "Helvetica");
        assert_eq!(config.style.text_color, "#737373");
    }

    #[test]
    fn validate_rejects_missing_database() {
        let mut config = Config::default();
        config.database.path = PathBuf::from("/definitely/not/here.db");
        assert!(config.validate().is_err());
    }
}
