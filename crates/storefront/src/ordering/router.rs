use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::json;

use super::checkout::OrderRequest;
use super::clock::{deserialize_optional_local_time, parse_local_time};
use super::geo::GeoPoint;
use super::repository::{RestaurantId, SettingsError, SettingsRepository};
use super::service::{StorefrontService, StorefrontServiceError};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OpenStatusQuery {
    #[serde(default)]
    pub(crate) at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeliveryFeeRequest {
    pub(crate) subtotal: f64,
    #[serde(default)]
    pub(crate) delivery_location: Option<GeoPoint>,
    #[serde(default, deserialize_with = "deserialize_optional_local_time")]
    pub(crate) at: Option<NaiveDateTime>,
}

/// Router builder exposing the hours, zone, fee and checkout endpoints.
pub fn storefront_router<R>(service: Arc<StorefrontService<R>>) -> Router
where
    R: SettingsRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/restaurants/:restaurant_id/hours/open",
            get(open_status_handler::<R>),
        )
        .route(
            "/api/v1/restaurants/:restaurant_id/delivery/zone",
            post(zone_check_handler::<R>),
        )
        .route(
            "/api/v1/restaurants/:restaurant_id/delivery/fee",
            post(delivery_fee_handler::<R>),
        )
        .route(
            "/api/v1/restaurants/:restaurant_id/checkout/quote",
            post(quote_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn open_status_handler<R>(
    State(service): State<Arc<StorefrontService<R>>>,
    Path(restaurant_id): Path<String>,
    Query(query): Query<OpenStatusQuery>,
) -> Response
where
    R: SettingsRepository + 'static,
{
    let at = match query.at.as_deref().map(parse_local_time).transpose() {
        Ok(at) => at,
        Err(message) => {
            let payload = json!({ "error": message });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    match service.is_open(&RestaurantId(restaurant_id), at) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn zone_check_handler<R>(
    State(service): State<Arc<StorefrontService<R>>>,
    Path(restaurant_id): Path<String>,
    Json(point): Json<GeoPoint>,
) -> Response
where
    R: SettingsRepository + 'static,
{
    match service.check_address(&RestaurantId(restaurant_id), point) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delivery_fee_handler<R>(
    State(service): State<Arc<StorefrontService<R>>>,
    Path(restaurant_id): Path<String>,
    Json(request): Json<DeliveryFeeRequest>,
) -> Response
where
    R: SettingsRepository + 'static,
{
    let DeliveryFeeRequest {
        subtotal,
        delivery_location,
        at,
    } = request;

    match service.delivery_fee(
        &RestaurantId(restaurant_id),
        subtotal,
        delivery_location,
        at,
    ) {
        Ok(quote) => (StatusCode::OK, Json(quote)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn quote_handler<R>(
    State(service): State<Arc<StorefrontService<R>>>,
    Path(restaurant_id): Path<String>,
    Json(order): Json<OrderRequest>,
) -> Response
where
    R: SettingsRepository + 'static,
{
    match service.quote(&RestaurantId(restaurant_id), &order) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: StorefrontServiceError) -> Response {
    let status = match &error {
        StorefrontServiceError::Settings(SettingsError::NotFound) => StatusCode::NOT_FOUND,
        StorefrontServiceError::Settings(SettingsError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
