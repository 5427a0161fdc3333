use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use storefront::error::AppError;
use storefront::ordering::{
    load_settings_file, GeoPoint, RestaurantId, SettingsError, SettingsRepository, StoreSettings,
    TaxRate,
};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySettingsRepository {
    records: Arc<Mutex<HashMap<RestaurantId, StoreSettings>>>,
}

impl InMemorySettingsRepository {
    pub(crate) fn seeded(settings: Vec<StoreSettings>) -> Result<Self, SettingsError> {
        let repository = Self::default();
        for record in settings {
            repository.upsert(record)?;
        }
        Ok(repository)
    }

    pub(crate) fn len(&self) -> usize {
        self.records.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

impl SettingsRepository for InMemorySettingsRepository {
    fn fetch(&self, id: &RestaurantId) -> Result<Option<StoreSettings>, SettingsError> {
        let guard = self.records.lock().map_err(poisoned)?;
        Ok(guard.get(id).cloned())
    }

    fn upsert(&self, settings: StoreSettings) -> Result<(), SettingsError> {
        let mut guard = self.records.lock().map_err(poisoned)?;
        guard.insert(settings.restaurant_id.clone(), settings);
        Ok(())
    }
}

fn poisoned<T>(_err: std::sync::PoisonError<T>) -> SettingsError {
    SettingsError::Unavailable("settings mutex poisoned".to_string())
}

/// Loads the settings file when one is configured, otherwise the built-in sample restaurants.
pub(crate) fn load_repository(
    path: Option<&Path>,
) -> Result<InMemorySettingsRepository, AppError> {
    let settings = match path {
        Some(path) => {
            let settings = load_settings_file(path)?;
            info!(path = %path.display(), restaurants = settings.len(), "loaded settings file");
            settings
        }
        None => sample_settings(),
    };

    InMemorySettingsRepository::seeded(settings).map_err(|err| AppError::Storefront(err.into()))
}

pub(crate) fn sample_settings() -> Vec<StoreSettings> {
    vec![
        StoreSettings {
            restaurant_id: RestaurantId("bistro-plateau".to_string()),
            name: "Bistro du Plateau".to_string(),
            location: Some(GeoPoint::new(45.5225, -73.5820)),
            hours_json: Some(json!({
                "lundi": "11h00-21h00",
                "mardi": "11h00-21h00",
                "mercredi": "11h00-21h00",
                "jeudi": "11h00-22h00",
                "vendredi": "11h00-14h00, 17h00-02h00",
                "samedi": "17h00-02h00",
                "dimanche": "Fermé"
            })),
            delivery_zones_geojson: Some(json!({
                "type": "FeatureCollection",
                "features": [
                    {
                        "type": "Feature",
                        "properties": { "name": "Plateau" },
                        "geometry": {
                            "type": "Polygon",
                            "coordinates": [[
                                [-73.6100, 45.5000],
                                [-73.5500, 45.5000],
                                [-73.5500, 45.5500],
                                [-73.6100, 45.5500],
                                [-73.6100, 45.5000]
                            ]]
                        }
                    },
                    {
                        "type": "Feature",
                        "properties": { "name": "Vieux-Port" },
                        "geometry": {
                            "type": "Polygon",
                            "coordinates": [[
                                [-73.5650, 45.4950],
                                [-73.5400, 45.4950],
                                [-73.5400, 45.5120],
                                [-73.5650, 45.5120],
                                [-73.5650, 45.4950]
                            ]]
                        }
                    }
                ]
            })),
            delivery_fee_rules: Some(json!({
                "type": "distance_based",
                "baseFee": 2.99,
                "perKmFee": 0.75,
                "maxDistanceKm": 8,
                "freeDeliveryAbove": 60,
                "peakHours": [
                    { "start": "11:30", "end": "13:30", "additionalFee": 1.0 },
                    { "start": "17:30", "end": "19:30", "additionalFee": 1.5 }
                ],
                "weekendFee": 1.0,
                "minimumOrderSurcharge": { "threshold": 20, "surcharge": 2.5 }
            })),
            tax_rates: vec![
                TaxRate {
                    label: "TPS".to_string(),
                    rate: 0.05,
                },
                TaxRate {
                    label: "TVQ".to_string(),
                    rate: 0.09975,
                },
            ],
        },
        StoreSettings {
            restaurant_id: RestaurantId("cafe-gare".to_string()),
            name: "Café de la Gare".to_string(),
            location: Some(GeoPoint::new(45.4995, -73.5664)),
            hours_json: Some(Value::String(
                json!(["Fermé", "7h-15h", "7h-15h", "7h-15h", "7h-15h", "7h-15h", "8h-13h"])
                    .to_string(),
            )),
            delivery_zones_geojson: None,
            delivery_fee_rules: Some(json!({ "type": "flat", "baseFee": 3.49 })),
            tax_rates: vec![TaxRate {
                label: "TPS".to_string(),
                rate: 0.05,
            }],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_settings_seed_the_repository() {
        let repository = load_repository(None).expect("samples load");
        assert_eq!(repository.len(), 2);

        let bistro = repository
            .fetch(&RestaurantId("bistro-plateau".to_string()))
            .expect("fetch succeeds")
            .expect("bistro seeded");
        assert_eq!(bistro.tax_rates.len(), 2);
        assert!(repository
            .fetch(&RestaurantId("unknown".to_string()))
            .expect("fetch succeeds")
            .is_none());
    }

    #[test]
    fn missing_settings_file_is_reported() {
        match load_repository(Some(Path::new("no/such/settings.json"))) {
            Err(AppError::Settings(_)) => {}
            Err(other) => panic!("expected settings error, got {other:?}"),
            Ok(_) => panic!("expected settings error, got a repository"),
        }
    }
}
