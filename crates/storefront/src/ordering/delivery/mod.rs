//! Delivery fee pricing with an itemized breakdown.

mod calendar;
mod pricing;
mod rules;

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::geo::GeoPoint;

pub use calendar::{FixedHolidays, HolidayCalendar, NoHolidays};
pub use rules::{DeliveryFeeRules, MinimumOrderSurcharge, PeakWindow, PricingKind};

pub const FREE_DELIVERY_LABEL: &str = "Livraison gratuite";
pub const BASE_FEE_LABEL: &str = "Frais de base";
pub const PEAK_HOURS_LABEL: &str = "Heures de pointe";
pub const WEEKEND_LABEL: &str = "Supplément fin de semaine";
pub const HOLIDAY_LABEL: &str = "Supplément jour férié";
pub const MINIMUM_ORDER_LABEL: &str = "Supplément commande minimum";

/// One itemized contributor to the delivery fee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeBreakdownLine {
    pub label: String,
    pub amount: f64,
}

impl FeeBreakdownLine {
    pub fn new(label: impl Into<String>, amount: f64) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// Priced delivery. An empty breakdown means no rule applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryFeeQuote {
    pub fee: f64,
    pub breakdown: Vec<FeeBreakdownLine>,
}

/// Order facts the fee depends on. The time is the store's local wall clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryContext {
    pub subtotal: f64,
    pub restaurant_location: Option<GeoPoint>,
    pub delivery_location: Option<GeoPoint>,
    pub current_time: NaiveDateTime,
}

/// Stateless fee calculator bound to a holiday calendar.
#[derive(Clone)]
pub struct DeliveryFeeCalculator {
    calendar: Arc<dyn HolidayCalendar>,
}

impl Default for DeliveryFeeCalculator {
    fn default() -> Self {
        Self::new(Arc::new(NoHolidays))
    }
}

impl DeliveryFeeCalculator {
    pub fn new(calendar: Arc<dyn HolidayCalendar>) -> Self {
        Self { calendar }
    }

    pub fn quote(&self, rules: Option<&Value>, context: &DeliveryContext) -> DeliveryFeeQuote {
        pricing::price_from_value(rules, context, self.calendar.as_ref())
    }
}

/// Prices a delivery with no holiday calendar.
pub fn calculate_delivery_fee(
    rules: Option<&Value>,
    context: &DeliveryContext,
) -> DeliveryFeeQuote {
    pricing::price_from_value(rules, context, &NoHolidays)
}
