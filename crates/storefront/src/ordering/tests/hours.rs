use serde_json::{json, Value};

use super::common::*;
use crate::ordering::hours::{is_open_now, WeeklyHours};

#[test]
fn missing_or_empty_hours_are_always_open() {
    let empty_string = json!("{}");
    let empty_object = json!({});

    for at in [monday_at(3, 0), sunday_at(23, 59)] {
        assert!(is_open_now(None, at));
        assert!(is_open_now(Some(&Value::Null), at));
        assert!(is_open_now(Some(&empty_string), at));
        assert!(is_open_now(Some(&empty_object), at));
    }
}

#[test]
fn simple_window_opens_and_closes() {
    let hours = json!({ "lundi": "11h00-20h00" });

    assert!(is_open_now(Some(&hours), monday_at(15, 0)));
    assert!(is_open_now(Some(&hours), monday_at(11, 0)));
    assert!(!is_open_now(Some(&hours), monday_at(20, 0)));
    assert!(!is_open_now(Some(&hours), monday_at(21, 0)));
    assert!(!is_open_now(Some(&hours), monday_at(10, 59)));
}

#[test]
fn late_night_window_carries_into_next_day() {
    let hours = json!({ "vendredi": "22h00-02h00" });

    assert!(is_open_now(Some(&hours), friday_at(23, 0)));
    assert!(is_open_now(Some(&hours), saturday_at(1, 0)));
    assert!(!is_open_now(Some(&hours), saturday_at(2, 0)));
    assert!(!is_open_now(Some(&hours), saturday_at(3, 0)));
    assert!(!is_open_now(Some(&hours), thursday_at(23, 0)));
}

#[test]
fn saturday_night_carries_into_sunday() {
    let hours = json!({ "saturday": "8pm-3am" });

    assert!(is_open_now(Some(&hours), sunday_at(2, 30)));
    assert!(!is_open_now(Some(&hours), sunday_at(3, 30)));
}

#[test]
fn daytime_windows_do_not_spill_into_the_next_morning() {
    let hours = json!({ "monday": "9:00-17:00" });

    assert!(!is_open_now(Some(&hours), at(7, 8, 0)));
}

#[test]
fn schedule_of_only_closed_days_counts_as_always_open() {
    let hours = json!({ "lundi": "Fermé", "mardi": "closed", "mercredi": { "closed": true } });

    assert!(WeeklyHours::from_value(&hours).is_empty());
    assert!(is_open_now(Some(&hours), monday_at(12, 0)));
}

#[test]
fn unknown_days_are_ignored_but_known_days_apply() {
    let hours = json!({ "holiday": "10h-12h", "mardi": "10h-12h" });

    assert!(is_open_now(Some(&hours), at(7, 11, 0)));
    assert!(!is_open_now(Some(&hours), monday_at(11, 0)));
}

#[test]
fn split_service_honours_each_range() {
    let hours = json!({ "jeudi": [{ "open": "11:00", "close": "14:00" }, "17h-22h"] });

    assert!(is_open_now(Some(&hours), thursday_at(12, 0)));
    assert!(!is_open_now(Some(&hours), thursday_at(15, 30)));
    assert!(is_open_now(Some(&hours), thursday_at(21, 59)));
}

#[test]
fn string_encoded_fixture_matches_structured_form() {
    let structured = hours_json();
    let encoded = Value::String(structured.to_string());

    for at in [monday_at(15, 0), sunday_at(1, 30), sunday_at(12, 0), saturday_at(1, 0)] {
        assert_eq!(
            is_open_now(Some(&structured), at),
            is_open_now(Some(&encoded), at),
            "disagreement at {at}"
        );
    }
}

#[test]
fn evaluation_is_repeatable() {
    let hours = hours_json();
    let at = friday_at(23, 30);

    let first = is_open_now(Some(&hours), at);
    let second = is_open_now(Some(&hours), at);
    assert!(first);
    assert_eq!(first, second);
}
