use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Fulfillment;
use crate::ordering::geofence::extract_polygons_from_geojson;
use crate::ordering::hours::is_open_now;
use crate::ordering::repository::StoreSettings;

/// Whether the order may be placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutDecision {
    Accepted,
    Rejected(RejectionReason),
}

impl CheckoutDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, CheckoutDecision::Accepted)
    }

    pub fn summary(&self) -> String {
        match self {
            CheckoutDecision::Accepted => "order accepted".to_string(),
            CheckoutDecision::Rejected(reason) => reason.summary(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    StoreClosed,
    OutsideDeliveryZone { zone_count: usize },
}

impl RejectionReason {
    pub fn summary(&self) -> String {
        match self {
            RejectionReason::StoreClosed => "restaurant is closed at this time".to_string(),
            RejectionReason::OutsideDeliveryZone { zone_count } => format!(
                "delivery address is outside the {zone_count} configured delivery zone(s)"
            ),
        }
    }
}

/// Hours gate first, then the delivery zone. Stores without zones deliver anywhere.
pub(crate) fn decide_outcome(
    settings: &StoreSettings,
    fulfillment: &Fulfillment,
    at: NaiveDateTime,
) -> CheckoutDecision {
    if !is_open_now(settings.hours_json.as_ref(), at) {
        return CheckoutDecision::Rejected(RejectionReason::StoreClosed);
    }

    if let Fulfillment::Delivery { location } = fulfillment {
        let zones = settings
            .delivery_zones_geojson
            .as_ref()
            .map(extract_polygons_from_geojson)
            .unwrap_or_default();
        if !zones.is_empty() && !zones.contains(*location) {
            return CheckoutDecision::Rejected(RejectionReason::OutsideDeliveryZone {
                zone_count: zones.len(),
            });
        }
    }

    CheckoutDecision::Accepted
}
