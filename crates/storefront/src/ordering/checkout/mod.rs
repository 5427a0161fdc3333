//! Composes hours, delivery zones and delivery pricing into a checkout decision and quote.

mod policy;
mod quote;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::clock::deserialize_optional_local_time;
use super::delivery::{DeliveryContext, DeliveryFeeCalculator, DeliveryFeeQuote};
use super::geo::GeoPoint;
use super::money::non_negative;
use super::repository::{RestaurantId, StoreSettings};

pub use policy::{CheckoutDecision, RejectionReason};
pub use quote::{OrderQuote, TaxLine};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Fulfillment {
    Pickup,
    Delivery { location: GeoPoint },
}

/// Cart totals and fulfillment choice submitted at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub subtotal: f64,
    #[serde(default)]
    pub tip: f64,
    pub fulfillment: Fulfillment,
    /// Store-local wall-clock time; the service uses its clock when absent.
    #[serde(default, deserialize_with = "deserialize_optional_local_time")]
    pub placed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutOutcome {
    pub restaurant_id: RestaurantId,
    pub evaluated_at: NaiveDateTime,
    pub decision: CheckoutDecision,
    pub quote: OrderQuote,
}

/// Stateless engine; every input arrives with the call.
#[derive(Clone, Default)]
pub struct CheckoutEngine {
    fees: DeliveryFeeCalculator,
}

impl CheckoutEngine {
    pub fn new(fees: DeliveryFeeCalculator) -> Self {
        Self { fees }
    }

    pub fn evaluate(
        &self,
        settings: &StoreSettings,
        order: &OrderRequest,
        at: NaiveDateTime,
    ) -> CheckoutOutcome {
        let decision = policy::decide_outcome(settings, &order.fulfillment, at);
        if let CheckoutDecision::Rejected(reason) = &decision {
            info!(
                restaurant = %settings.restaurant_id.0,
                reason = %reason.summary(),
                "checkout rejected"
            );
        }

        let delivery = match order.fulfillment {
            Fulfillment::Pickup => DeliveryFeeQuote::default(),
            Fulfillment::Delivery { location } => self.fees.quote(
                settings.delivery_fee_rules.as_ref(),
                &DeliveryContext {
                    subtotal: non_negative(order.subtotal),
                    restaurant_location: settings.location,
                    delivery_location: Some(location),
                    current_time: at,
                },
            ),
        };

        let quote = quote::build_quote(order.subtotal, order.tip, delivery, &settings.tax_rates);

        CheckoutOutcome {
            restaurant_id: settings.restaurant_id.clone(),
            evaluated_at: at,
            decision,
            quote,
        }
    }
}
