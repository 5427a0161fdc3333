use serde::Serialize;
use serde_json::{Map, Value};

use crate::ordering::money::finite_amount;

/// How the base part of the delivery fee is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingKind {
    Flat,
    DistanceBased,
    /// Unset or unrecognised `type`; priced like `Flat`.
    Standard,
}

/// Clock-range surcharge. `end < start` wraps past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeakWindow {
    pub start: u16,
    pub end: u16,
    pub additional_fee: f64,
}

impl PeakWindow {
    pub fn contains(&self, minute: u16) -> bool {
        if self.end < self.start {
            minute >= self.start || minute < self.end
        } else {
            self.start <= minute && minute < self.end
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MinimumOrderSurcharge {
    pub threshold: f64,
    pub surcharge: f64,
}

/// Typed view over a store's `delivery_fee_rules` blob. Unusable fields read as absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryFeeRules {
    pub pricing: PricingKind,
    pub base_fee: Option<f64>,
    pub per_km_fee: Option<f64>,
    /// Advisory only: a longer trip is still priced.
    pub max_distance_km: Option<f64>,
    pub free_delivery_above: Option<f64>,
    pub peak_hours: Vec<PeakWindow>,
    pub weekend_fee: Option<f64>,
    pub holiday_fee: Option<f64>,
    pub minimum_order_surcharge: Option<MinimumOrderSurcharge>,
}

impl DeliveryFeeRules {
    /// `None` unless the value is a JSON object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;

        let pricing = match map.get("type").and_then(Value::as_str) {
            Some("flat") => PricingKind::Flat,
            Some("distance_based") => PricingKind::DistanceBased,
            _ => PricingKind::Standard,
        };

        Some(Self {
            pricing,
            base_fee: finite_amount(map.get("baseFee")),
            per_km_fee: finite_amount(map.get("perKmFee")),
            max_distance_km: finite_amount(map.get("maxDistanceKm")),
            free_delivery_above: finite_amount(map.get("freeDeliveryAbove")),
            peak_hours: peak_windows(map),
            weekend_fee: finite_amount(map.get("weekendFee")),
            holiday_fee: finite_amount(map.get("holidayFee")),
            minimum_order_surcharge: minimum_order_surcharge(map),
        })
    }

    /// Largest surcharge among the windows covering `minute`. Overlaps never stack.
    pub fn peak_surcharge(&self, minute: u16) -> Option<f64> {
        self.peak_hours
            .iter()
            .filter(|window| window.contains(minute))
            .map(|window| window.additional_fee)
            .reduce(f64::max)
    }
}

fn peak_windows(map: &Map<String, Value>) -> Vec<PeakWindow> {
    let Some(windows) = map.get("peakHours").and_then(Value::as_array) else {
        return Vec::new();
    };

    windows
        .iter()
        .filter_map(|window| {
            let start = window.get("start").and_then(Value::as_str).and_then(parse_clock)?;
            let end = window.get("end").and_then(Value::as_str).and_then(parse_clock)?;
            let additional_fee = finite_amount(window.get("additionalFee"))?;
            Some(PeakWindow {
                start,
                end,
                additional_fee,
            })
        })
        .collect()
}

fn minimum_order_surcharge(map: &Map<String, Value>) -> Option<MinimumOrderSurcharge> {
    let rule = map.get("minimumOrderSurcharge")?;
    Some(MinimumOrderSurcharge {
        threshold: finite_amount(rule.get("threshold"))?,
        surcharge: finite_amount(rule.get("surcharge"))?,
    })
}

/// Parses `HH:MM` into minutes since midnight. `24:00` is accepted as end of day.
fn parse_clock(raw: &str) -> Option<u16> {
    let (hours, minutes) = raw.trim().split_once(':')?;
    let hours: u16 = hours.trim().parse().ok()?;
    let minutes: u16 = minutes.trim().parse().ok()?;
    if minutes > 59 || hours > 24 || (hours == 24 && minutes > 0) {
        return None;
    }
    Some(hours * 60 + minutes)
}
