use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::checkout::{CheckoutEngine, CheckoutOutcome, OrderRequest};
use super::clock::StoreClock;
use super::delivery::{
    DeliveryContext, DeliveryFeeCalculator, DeliveryFeeQuote, HolidayCalendar, NoHolidays,
};
use super::geo::GeoPoint;
use super::geofence::extract_polygons_from_geojson;
use super::hours::is_open_now;
use super::repository::{RestaurantId, SettingsError, SettingsRepository, StoreSettings};

/// Public view of the hours check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenStatusView {
    pub restaurant_id: RestaurantId,
    pub open: bool,
    pub evaluated_at: NaiveDateTime,
}

/// Public view of the delivery-zone check. `accepted` is true when no zones are configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneCheckView {
    pub restaurant_id: RestaurantId,
    pub inside: bool,
    pub zone_count: usize,
    pub accepted: bool,
}

/// Service resolving restaurant settings and running the ordering calculators against them.
pub struct StorefrontService<R> {
    repository: Arc<R>,
    clock: StoreClock,
    fees: DeliveryFeeCalculator,
    engine: CheckoutEngine,
}

impl<R> StorefrontService<R>
where
    R: SettingsRepository + 'static,
{
    pub fn new(repository: Arc<R>, clock: StoreClock) -> Self {
        Self::with_calendar(repository, clock, Arc::new(NoHolidays))
    }

    pub fn with_calendar(
        repository: Arc<R>,
        clock: StoreClock,
        calendar: Arc<dyn HolidayCalendar>,
    ) -> Self {
        let fees = DeliveryFeeCalculator::new(calendar);
        let engine = CheckoutEngine::new(fees.clone());
        Self {
            repository,
            clock,
            fees,
            engine,
        }
    }

    pub fn settings(&self, id: &RestaurantId) -> Result<StoreSettings, StorefrontServiceError> {
        let settings = self.repository.fetch(id)?.ok_or(SettingsError::NotFound)?;
        Ok(settings)
    }

    pub fn is_open(
        &self,
        id: &RestaurantId,
        at: Option<NaiveDateTime>,
    ) -> Result<OpenStatusView, StorefrontServiceError> {
        let settings = self.settings(id)?;
        let evaluated_at = self.clock.resolve(at);
        Ok(OpenStatusView {
            restaurant_id: settings.restaurant_id,
            open: is_open_now(settings.hours_json.as_ref(), evaluated_at),
            evaluated_at,
        })
    }

    pub fn check_address(
        &self,
        id: &RestaurantId,
        point: GeoPoint,
    ) -> Result<ZoneCheckView, StorefrontServiceError> {
        let settings = self.settings(id)?;
        let zones = settings
            .delivery_zones_geojson
            .as_ref()
            .map(extract_polygons_from_geojson)
            .unwrap_or_default();
        let inside = zones.contains(point);
        Ok(ZoneCheckView {
            restaurant_id: settings.restaurant_id,
            inside,
            zone_count: zones.len(),
            accepted: zones.is_empty() || inside,
        })
    }

    pub fn delivery_fee(
        &self,
        id: &RestaurantId,
        subtotal: f64,
        destination: Option<GeoPoint>,
        at: Option<NaiveDateTime>,
    ) -> Result<DeliveryFeeQuote, StorefrontServiceError> {
        let settings = self.settings(id)?;
        let context = DeliveryContext {
            subtotal,
            restaurant_location: settings.location,
            delivery_location: destination,
            current_time: self.clock.resolve(at),
        };
        Ok(self.fees.quote(settings.delivery_fee_rules.as_ref(), &context))
    }

    pub fn quote(
        &self,
        id: &RestaurantId,
        order: &OrderRequest,
    ) -> Result<CheckoutOutcome, StorefrontServiceError> {
        let settings = self.settings(id)?;
        let at = self.clock.resolve(order.placed_at);
        Ok(self.engine.evaluate(&settings, order, at))
    }
}

/// Error raised by the storefront service.
#[derive(Debug, thiserror::Error)]
pub enum StorefrontServiceError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
