use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};

use crate::ordering::clock::StoreClock;
use crate::ordering::geo::GeoPoint;
use crate::ordering::repository::{
    RestaurantId, SettingsError, SettingsRepository, StoreSettings, TaxRate,
};
use crate::ordering::service::StorefrontService;

pub(super) fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 10, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .expect("valid timestamp")
}

// Week of 2025-10-06 (Monday) through 2025-10-12 (Sunday).
pub(super) fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
    at(6, hour, minute)
}

pub(super) fn thursday_at(hour: u32, minute: u32) -> NaiveDateTime {
    at(9, hour, minute)
}

pub(super) fn friday_at(hour: u32, minute: u32) -> NaiveDateTime {
    at(10, hour, minute)
}

pub(super) fn saturday_at(hour: u32, minute: u32) -> NaiveDateTime {
    at(11, hour, minute)
}

pub(super) fn sunday_at(hour: u32, minute: u32) -> NaiveDateTime {
    at(12, hour, minute)
}

pub(super) fn assert_amount(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn restaurant_location() -> GeoPoint {
    GeoPoint::new(45.5017, -73.5673)
}

/// About 5.0 km due north of the restaurant, inside the delivery zone.
pub(super) fn nearby_address() -> GeoPoint {
    GeoPoint::new(45.5467, -73.5673)
}

pub(super) fn out_of_zone_address() -> GeoPoint {
    GeoPoint::new(45.80, -73.5673)
}

pub(super) fn hours_json() -> Value {
    json!({
        "dimanche": "Fermé",
        "lundi": "11h00-20h00",
        "mardi": "11h00-20h00",
        "mercredi": "11h00-20h00",
        "jeudi": "11h00-22h00",
        "vendredi": "11h00-14h00, 17h00-02h00",
        "samedi": "17h00-02h00"
    })
}

pub(super) fn delivery_zones() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": { "name": "Centre-ville" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [-73.70, 45.40],
                    [-73.45, 45.40],
                    [-73.45, 45.62],
                    [-73.70, 45.62],
                    [-73.70, 45.40]
                ]]
            }
        }]
    })
}

pub(super) fn delivery_fee_rules() -> Value {
    json!({
        "type": "distance_based",
        "baseFee": 2.99,
        "perKmFee": 0.5,
        "maxDistanceKm": 10,
        "freeDeliveryAbove": 75,
        "peakHours": [{ "start": "17:00", "end": "19:00", "additionalFee": 1.5 }],
        "weekendFee": 1,
        "minimumOrderSurcharge": { "threshold": 20, "surcharge": 2.5 }
    })
}

pub(super) fn quebec_taxes() -> Vec<TaxRate> {
    vec![
        TaxRate {
            label: "TPS".to_string(),
            rate: 0.05,
        },
        TaxRate {
            label: "TVQ".to_string(),
            rate: 0.09975,
        },
    ]
}

pub(super) fn store_settings() -> StoreSettings {
    StoreSettings {
        restaurant_id: RestaurantId("bistro".to_string()),
        name: "Bistro du Plateau".to_string(),
        location: Some(restaurant_location()),
        hours_json: Some(hours_json()),
        delivery_zones_geojson: Some(delivery_zones()),
        delivery_fee_rules: Some(delivery_fee_rules()),
        tax_rates: quebec_taxes(),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySettings {
    records: Arc<Mutex<HashMap<RestaurantId, StoreSettings>>>,
}

impl MemorySettings {
    pub(super) fn with(settings: StoreSettings) -> Self {
        let repository = Self::default();
        repository.upsert(settings).expect("memory upsert");
        repository
    }
}

impl SettingsRepository for MemorySettings {
    fn fetch(&self, id: &RestaurantId) -> Result<Option<StoreSettings>, SettingsError> {
        let guard = self.records.lock().expect("settings mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn upsert(&self, settings: StoreSettings) -> Result<(), SettingsError> {
        let mut guard = self.records.lock().expect("settings mutex poisoned");
        guard.insert(settings.restaurant_id.clone(), settings);
        Ok(())
    }
}

pub(super) struct UnavailableSettings;

impl SettingsRepository for UnavailableSettings {
    fn fetch(&self, _id: &RestaurantId) -> Result<Option<StoreSettings>, SettingsError> {
        Err(SettingsError::Unavailable("connection refused".to_string()))
    }

    fn upsert(&self, _settings: StoreSettings) -> Result<(), SettingsError> {
        Err(SettingsError::Unavailable("connection refused".to_string()))
    }
}

pub(super) fn bistro_service() -> Arc<StorefrontService<MemorySettings>> {
    Arc::new(StorefrontService::new(
        Arc::new(MemorySettings::with(store_settings())),
        StoreClock::default(),
    ))
}

pub(super) fn bistro_id() -> RestaurantId {
    RestaurantId("bistro".to_string())
}
