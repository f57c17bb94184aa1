use crate::error::{Error, Result};
use crate::model::Coordinates;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
struct CityRow {
    #[serde(rename = "City")]
    city: String,
    latitude: f64,
    longitude: f64,
}

/// Static reference mapping from canonical (uppercased) city name to its
/// coordinates. Loaded once from CSV; read-only afterwards.
#[derive(Debug, Default)]
pub struct CityIndex {
    cities: HashMap<String, Coordinates>,
}

impl CityIndex {
    pub fn from_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| {
            Error::geography(format!("failed to open {}: {e}", path.display()))
        })?;

        let mut cities = HashMap::new();
        for row in reader.deserialize() {
            let row: CityRow =
                row.map_err(|e| Error::geography(format!("bad row in {}: {e}", path.display())))?;
            cities.insert(
                row.city.trim().to_uppercase(),
                Coordinates {
                    latitude: row.latitude,
                    longitude: row.longitude,
                },
            );
        }

        if cities.is_empty() {
            return Err(Error::geography(format!(
                "city reference {} contains no rows",
                path.display()
            )));
        }

        info!(cities = cities.len(), "loaded city reference");
        Ok(Self { cities })
    }

    #[cfg(test)]
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Coordinates)>) -> Self {
        Self {
            cities: entries.into_iter().collect(),
        }
    }

    /// Coordinates for a canonical (already uppercased) city key.
    pub fn lookup(&self, key: &str) -> Option<Coordinates> {
        self.cities.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}
