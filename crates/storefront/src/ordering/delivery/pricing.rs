use chrono::{Datelike, Timelike, Weekday};
use serde_json::Value;
use tracing::debug;

use super::calendar::HolidayCalendar;
use super::rules::{DeliveryFeeRules, PricingKind};
use super::{
    DeliveryContext, DeliveryFeeQuote, FeeBreakdownLine, BASE_FEE_LABEL, FREE_DELIVERY_LABEL,
    HOLIDAY_LABEL, MINIMUM_ORDER_LABEL, PEAK_HOURS_LABEL, WEEKEND_LABEL,
};
use crate::ordering::geo::haversine_km;
use crate::ordering::money::{round_cents, round_tenths};

pub(super) fn price_from_value(
    rules: Option<&Value>,
    context: &DeliveryContext,
    calendar: &dyn HolidayCalendar,
) -> DeliveryFeeQuote {
    match rules.and_then(DeliveryFeeRules::from_value) {
        Some(rules) => price_delivery(&rules, context, calendar),
        None => DeliveryFeeQuote::default(),
    }
}

/// Applies the rules in order: free threshold, base, peak, weekend, holiday, minimum order.
fn price_delivery(
    rules: &DeliveryFeeRules,
    context: &DeliveryContext,
    calendar: &dyn HolidayCalendar,
) -> DeliveryFeeQuote {
    if let Some(threshold) = rules.free_delivery_above {
        if context.subtotal >= threshold {
            return DeliveryFeeQuote {
                fee: 0.0,
                breakdown: vec![FeeBreakdownLine::new(FREE_DELIVERY_LABEL, 0.0)],
            };
        }
    }

    let mut breakdown = Vec::new();

    match rules.pricing {
        PricingKind::DistanceBased => {
            push_base_fee(rules, &mut breakdown);
            if let Some(distance_km) = delivery_distance(context) {
                if let Some(max_distance_km) = rules.max_distance_km {
                    if distance_km > max_distance_km {
                        debug!(
                            distance_km,
                            max_distance_km, "delivery beyond advisory maximum distance"
                        );
                    }
                }
                if let Some(per_km_fee) = rules.per_km_fee {
                    breakdown.push(FeeBreakdownLine::new(
                        format!("Distance ({:.1} km)", round_tenths(distance_km)),
                        round_cents(distance_km * per_km_fee),
                    ));
                }
            }
        }
        PricingKind::Flat | PricingKind::Standard => push_base_fee(rules, &mut breakdown),
    }

    let at = context.current_time;
    let minute = (at.hour() * 60 + at.minute()) as u16;
    push_surcharge(&mut breakdown, PEAK_HOURS_LABEL, rules.peak_surcharge(minute));

    if matches!(at.weekday(), Weekday::Sat | Weekday::Sun) {
        push_surcharge(&mut breakdown, WEEKEND_LABEL, rules.weekend_fee);
    }

    if calendar.is_holiday(at.date()) {
        push_surcharge(&mut breakdown, HOLIDAY_LABEL, rules.holiday_fee);
    }

    if let Some(minimum) = rules.minimum_order_surcharge {
        if context.subtotal < minimum.threshold {
            push_surcharge(&mut breakdown, MINIMUM_ORDER_LABEL, Some(minimum.surcharge));
        }
    }

    // Starts from +0.0: an empty f64 `sum` is -0.0.
    let fee = round_cents(breakdown.iter().fold(0.0, |total, line| total + line.amount));
    DeliveryFeeQuote { fee, breakdown }
}

fn delivery_distance(context: &DeliveryContext) -> Option<f64> {
    haversine_km(context.restaurant_location?, context.delivery_location?)
}

fn push_base_fee(rules: &DeliveryFeeRules, breakdown: &mut Vec<FeeBreakdownLine>) {
    if let Some(base_fee) = rules.base_fee {
        breakdown.push(FeeBreakdownLine::new(BASE_FEE_LABEL, base_fee));
    }
}

fn push_surcharge(breakdown: &mut Vec<FeeBreakdownLine>, label: &str, amount: Option<f64>) {
    if let Some(amount) = amount.filter(|amount| *amount != 0.0) {
        breakdown.push(FeeBreakdownLine::new(label, amount));
    }
}
