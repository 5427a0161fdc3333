use serde::{Deserialize, Serialize};

use crate::ordering::delivery::{DeliveryFeeQuote, FeeBreakdownLine};
use crate::ordering::money::{non_negative, round_cents};
use crate::ordering::repository::TaxRate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxLine {
    pub label: String,
    pub rate: f64,
    pub amount: f64,
}

/// Order total: subtotal + delivery fee + taxes + tip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderQuote {
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub delivery_breakdown: Vec<FeeBreakdownLine>,
    pub taxes: Vec<TaxLine>,
    pub tip: f64,
    pub total: f64,
}

pub(crate) fn build_quote(
    subtotal: f64,
    tip: f64,
    delivery: DeliveryFeeQuote,
    tax_rates: &[TaxRate],
) -> OrderQuote {
    let subtotal = non_negative(subtotal);
    let tip = non_negative(tip);
    let taxable = subtotal + delivery.fee;

    let taxes: Vec<TaxLine> = tax_rates
        .iter()
        .filter(|tax| tax.rate.is_finite() && tax.rate > 0.0)
        .map(|tax| TaxLine {
            label: tax.label.clone(),
            rate: tax.rate,
            amount: round_cents(taxable * tax.rate),
        })
        .collect();

    let tax_total: f64 = taxes.iter().map(|line| line.amount).sum();
    let total = round_cents(subtotal + delivery.fee + tax_total + tip);

    OrderQuote {
        subtotal,
        delivery_fee: delivery.fee,
        delivery_breakdown: delivery.breakdown,
        taxes,
        tip,
        total,
    }
}
