use serde_json::Value;

/// Rounds to cents, halves going up (towards positive infinity).
pub(crate) fn round_cents(value: f64) -> f64 {
    round_half_up(value * 100.0) / 100.0
}

pub(crate) fn round_tenths(value: f64) -> f64 {
    round_half_up(value * 10.0) / 10.0
}

fn round_half_up(scaled: f64) -> f64 {
    let floor = scaled.floor();
    if scaled - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Reads a configuration number. Numeric strings count; anything non-finite is absent.
pub(crate) fn finite_amount(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Customer-supplied amounts below zero or non-finite collapse to zero.
pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rounds_half_cents_up() {
        assert_eq!(round_cents(4.99), 4.99);
        assert_eq!(round_cents(2.375), 2.38);
        assert_eq!(round_cents(-0.125), -0.12);
        assert_eq!(round_cents(7.0), 7.0);
    }

    #[test]
    fn rounds_distance_to_tenths() {
        assert_eq!(round_tenths(5.0038), 5.0);
        assert_eq!(round_tenths(3.25), 3.3);
    }

    #[test]
    fn finite_amount_accepts_numbers_and_numeric_strings() {
        assert_eq!(finite_amount(Some(&json!(4.5))), Some(4.5));
        assert_eq!(finite_amount(Some(&json!(" 3 "))), Some(3.0));
        assert_eq!(finite_amount(Some(&json!("NaN"))), None);
        assert_eq!(finite_amount(Some(&json!("inf"))), None);
        assert_eq!(finite_amount(Some(&json!(true))), None);
        assert_eq!(finite_amount(Some(&Value::Null)), None);
        assert_eq!(finite_amount(None), None);
    }

    #[test]
    fn non_negative_clamps_bad_input() {
        assert_eq!(non_negative(-3.0), 0.0);
        assert_eq!(non_negative(f64::NAN), 0.0);
        assert_eq!(non_negative(12.5), 12.5);
    }
}
