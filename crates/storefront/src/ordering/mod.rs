//! Order pricing and service eligibility: opening hours, delivery zones, delivery
//! fees, and the checkout quote composed from them.

pub mod checkout;
pub mod clock;
pub mod delivery;
pub mod geo;
pub mod geofence;
pub mod hours;
mod money;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use checkout::{
    CheckoutDecision, CheckoutEngine, CheckoutOutcome, Fulfillment, OrderQuote, OrderRequest,
    RejectionReason, TaxLine,
};
pub use clock::{parse_local_time, StoreClock};
pub use delivery::{
    calculate_delivery_fee, DeliveryContext, DeliveryFeeCalculator, DeliveryFeeQuote,
    DeliveryFeeRules, FeeBreakdownLine, FixedHolidays, HolidayCalendar, NoHolidays,
};
pub use geo::{haversine_km, GeoPoint};
pub use geofence::{
    extract_polygons_from_geojson, point_in_polygon, point_in_polygons, PolygonSet, Ring,
};
pub use hours::{is_open_now, TimeSegment, WeeklyHours};
pub use repository::{
    load_settings_file, load_settings_from_reader, RestaurantId, SettingsError,
    SettingsFileError, SettingsRepository, StoreSettings, TaxRate,
};
pub use router::storefront_router;
pub use service::{OpenStatusView, StorefrontService, StorefrontServiceError, ZoneCheckView};
