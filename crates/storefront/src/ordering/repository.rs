use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::geo::GeoPoint;

/// Identifier wrapper for restaurants in the configuration store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RestaurantId(pub String);

/// Sales tax applied to the subtotal and the delivery fee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRate {
    pub label: String,
    /// Fraction of the taxable amount, e.g. `0.05` for 5%.
    pub rate: f64,
}

/// Restaurant settings as stored by the configuration store.
///
/// `hours_json`, `delivery_zones_geojson` and `delivery_fee_rules` stay opaque JSON;
/// the ordering calculators tolerate any shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    pub restaurant_id: RestaurantId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub hours_json: Option<Value>,
    #[serde(default)]
    pub delivery_zones_geojson: Option<Value>,
    #[serde(default)]
    pub delivery_fee_rules: Option<Value>,
    #[serde(default)]
    pub tax_rates: Vec<TaxRate>,
}

/// Storage abstraction so the service can be exercised without the real store.
pub trait SettingsRepository: Send + Sync {
    fn fetch(&self, id: &RestaurantId) -> Result<Option<StoreSettings>, SettingsError>;
    fn upsert(&self, settings: StoreSettings) -> Result<(), SettingsError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("restaurant not found")]
    NotFound,
    #[error("settings store unavailable: {0}")]
    Unavailable(String),
}

/// Failure to read a settings file at startup.
#[derive(Debug, thiserror::Error)]
pub enum SettingsFileError {
    #[error("unable to read settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("settings file is not a JSON array of restaurants: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_settings_from_reader<R: Read>(
    reader: R,
) -> Result<Vec<StoreSettings>, SettingsFileError> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn load_settings_file(
    path: impl AsRef<Path>,
) -> Result<Vec<StoreSettings>, SettingsFileError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| SettingsFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_settings_from_reader(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_minimal_and_full_records() {
        let raw = r#"[
            { "restaurant_id": "bistro" },
            {
                "restaurant_id": "pizzeria",
                "name": "Pizzeria Napoli",
                "location": { "lat": 45.5, "lng": -73.57 },
                "hours_json": "{\"lundi\":\"11h00-22h00\"}",
                "delivery_fee_rules": { "type": "flat", "baseFee": 3.5 },
                "tax_rates": [{ "label": "TPS", "rate": 0.05 }]
            }
        ]"#;

        let settings = load_settings_from_reader(raw.as_bytes()).expect("settings parse");
        assert_eq!(settings.len(), 2);
        assert_eq!(settings[0].restaurant_id, RestaurantId("bistro".to_string()));
        assert!(settings[0].hours_json.is_none());
        assert!(settings[0].tax_rates.is_empty());
        assert_eq!(settings[1].location, Some(GeoPoint::new(45.5, -73.57)));
        assert_eq!(settings[1].tax_rates[0].rate, 0.05);
    }

    #[test]
    fn rejects_non_array_documents() {
        match load_settings_from_reader(r#"{ "restaurant_id": "solo" }"#.as_bytes()) {
            Err(SettingsFileError::Json(_)) => {}
            other => panic!("expected json error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_reports_path() {
        match load_settings_file("does/not/exist.json") {
            Err(SettingsFileError::Io { path, .. }) => {
                assert_eq!(path, PathBuf::from("does/not/exist.json"))
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
