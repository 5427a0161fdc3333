use crate::infra::{load_repository, InMemorySettingsRepository};
use chrono::{NaiveDate, NaiveDateTime};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use storefront::config::AppConfig;
use storefront::error::AppError;
use storefront::ordering::{
    parse_local_time, CheckoutOutcome, Fulfillment, GeoPoint, OrderRequest, RestaurantId,
    StoreClock, StorefrontService,
};

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Restaurant identifier as stored in the settings
    #[arg(long)]
    pub(crate) restaurant: String,
    /// Cart subtotal before delivery, taxes and tip
    #[arg(long)]
    pub(crate) subtotal: f64,
    /// Tip added on top of the total
    #[arg(long, default_value_t = 0.0)]
    pub(crate) tip: f64,
    /// Delivery latitude. Without coordinates the order is a pickup.
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub(crate) lat: Option<f64>,
    /// Delivery longitude
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub(crate) lng: Option<f64>,
    /// Store-local time of the order (YYYY-MM-DDTHH:MM). Defaults to now.
    #[arg(long, value_parser = parse_local_time)]
    pub(crate) at: Option<NaiveDateTime>,
    /// JSON settings file; falls back to APP_SETTINGS_PATH, then the sample restaurants
    #[arg(long)]
    pub(crate) settings: Option<PathBuf>,
    /// Print the outcome as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Store-local time for the open-store scenarios. Defaults to Friday 2025-10-10 18:00.
    #[arg(long, value_parser = parse_local_time)]
    pub(crate) at: Option<NaiveDateTime>,
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let QuoteArgs {
        restaurant,
        subtotal,
        tip,
        lat,
        lng,
        at,
        settings,
        json,
    } = args;

    let config = AppConfig::load()?;
    let clock = StoreClock::new(config.store.utc_offset());
    let settings_path = settings.or(config.store.settings_path);
    let repository = load_repository(settings_path.as_deref())?;
    let service = StorefrontService::new(Arc::new(repository), clock);

    let fulfillment = match (lat, lng) {
        (Some(lat), Some(lng)) => Fulfillment::Delivery {
            location: GeoPoint::new(lat, lng),
        },
        _ => Fulfillment::Pickup,
    };
    let order = OrderRequest {
        subtotal,
        tip,
        fulfillment,
        placed_at: at,
    };

    let outcome = service.quote(&RestaurantId(restaurant), &order)?;
    if json {
        match serde_json::to_string_pretty(&outcome) {
            Ok(payload) => println!("{}", payload),
            Err(err) => println!("Quote payload unavailable: {}", err),
        }
    } else {
        render_outcome(&outcome);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let open_at = args.at.unwrap_or_else(default_demo_time);
    let closed_at = NaiveDate::from_ymd_opt(2025, 10, 12).and_then(|day| day.and_hms_opt(12, 0, 0));

    let repository = Arc::new(load_repository(None)?);
    let service = StorefrontService::new(repository, StoreClock::default());

    println!("Storefront ordering demo");

    let mut scenarios = vec![
        (
            "Pickup at the bistro",
            "bistro-plateau",
            order(18.0, 0.0, Fulfillment::Pickup, Some(open_at)),
        ),
        (
            "Delivery inside the Plateau zone",
            "bistro-plateau",
            delivery(34.0, 5.0, GeoPoint::new(45.5400, -73.5900), open_at),
        ),
        (
            "Large order over the free delivery threshold",
            "bistro-plateau",
            delivery(72.0, 8.0, GeoPoint::new(45.5050, -73.5500), open_at),
        ),
        (
            "Delivery outside every zone",
            "bistro-plateau",
            delivery(34.0, 0.0, GeoPoint::new(45.6500, -73.7500), open_at),
        ),
        (
            "Café without zones delivers anywhere",
            "cafe-gare",
            delivery(12.0, 1.0, GeoPoint::new(45.4700, -73.6200), open_at),
        ),
    ];
    if let Some(closed_at) = closed_at {
        scenarios.push((
            "Sunday lunch while the bistro is closed",
            "bistro-plateau",
            delivery(34.0, 0.0, GeoPoint::new(45.5400, -73.5900), closed_at),
        ));
    }

    for (title, restaurant, request) in scenarios {
        println!("\n{}", title);
        run_scenario(&service, restaurant, &request);
    }

    Ok(())
}

fn run_scenario(
    service: &StorefrontService<InMemorySettingsRepository>,
    restaurant: &str,
    request: &OrderRequest,
) {
    match service.quote(&RestaurantId(restaurant.to_string()), request) {
        Ok(outcome) => render_outcome(&outcome),
        Err(err) => println!("  Quote unavailable: {}", err),
    }
}

fn default_demo_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 10, 10)
        .and_then(|day| day.and_hms_opt(18, 0, 0))
        .unwrap_or_default()
}

fn order(
    subtotal: f64,
    tip: f64,
    fulfillment: Fulfillment,
    placed_at: Option<NaiveDateTime>,
) -> OrderRequest {
    OrderRequest {
        subtotal,
        tip,
        fulfillment,
        placed_at,
    }
}

fn delivery(subtotal: f64, tip: f64, location: GeoPoint, at: NaiveDateTime) -> OrderRequest {
    order(subtotal, tip, Fulfillment::Delivery { location }, Some(at))
}

pub(crate) fn render_outcome(outcome: &CheckoutOutcome) {
    let quote = &outcome.quote;

    println!(
        "  Restaurant {} | {}",
        outcome.restaurant_id.0,
        outcome.evaluated_at.format("%A %Y-%m-%d %H:%M")
    );
    if outcome.decision.is_accepted() {
        println!("  Decision: accepted");
    } else {
        println!("  Decision: rejected ({})", outcome.decision.summary());
    }

    println!("  Subtotal: {:.2}", quote.subtotal);
    if quote.delivery_breakdown.is_empty() {
        println!("  Delivery: none");
    } else {
        println!("  Delivery: {:.2}", quote.delivery_fee);
        for line in &quote.delivery_breakdown {
            println!("    - {}: {:.2}", line.label, line.amount);
        }
    }
    for tax in &quote.taxes {
        println!("  {} ({:.3}%): {:.2}", tax.label, tax.rate * 100.0, tax.amount);
    }
    if quote.tip > 0.0 {
        println!("  Tip: {:.2}", quote.tip);
    }
    println!("  Total: {:.2}", quote.total);
}
