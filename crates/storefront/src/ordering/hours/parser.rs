use serde_json::{Map, Value};
use tracing::debug;

use super::{TimeSegment, WeeklyHours};

const OPEN_KEYS: [&str; 3] = ["open", "start", "from"];
const CLOSE_KEYS: [&str; 3] = ["close", "end", "to"];
const RANGE_SEPARATORS: [char; 4] = [',', ';', '/', '\n'];
const RANGE_JOINERS: [&str; 3] = ["et", "and", "&"];
const RANGE_DELIMITERS: [char; 4] = ['-', '\u{2013}', '\u{2014}', 'à'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

pub(super) fn parse_weekly_hours(value: &Value) -> WeeklyHours {
    let mut hours = WeeklyHours::default();

    match value {
        Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return hours;
            }
            return match serde_json::from_str::<Value>(trimmed) {
                Ok(decoded) => parse_weekly_hours(&decoded),
                Err(err) => {
                    debug!(%err, "hours blob is not valid JSON, treating store as always open");
                    hours
                }
            };
        }
        Value::Object(map) => {
            for (key, entry) in map {
                match day_index(key) {
                    Some(day) => {
                        for segment in parse_entry(entry) {
                            hours.push(day, segment);
                        }
                    }
                    None => debug!(key = %key, "ignoring unrecognised day in hours"),
                }
            }
        }
        Value::Array(entries) => {
            for (day, entry) in entries.iter().enumerate().take(7) {
                for segment in parse_entry(entry) {
                    hours.push(day, segment);
                }
            }
        }
        _ => {}
    }

    hours
}

/// Maps English or French day names (full or abbreviated) and 0-6 indices to 0 = Sunday.
fn day_index(key: &str) -> Option<usize> {
    let day = match key.trim().to_lowercase().as_str() {
        "0" | "sunday" | "sun" | "dimanche" | "dim" => 0,
        "1" | "monday" | "mon" | "lundi" | "lun" => 1,
        "2" | "tuesday" | "tue" | "tues" | "mardi" | "mar" => 2,
        "3" | "wednesday" | "wed" | "mercredi" | "mer" => 3,
        "4" | "thursday" | "thu" | "thurs" | "jeudi" | "jeu" => 4,
        "5" | "friday" | "fri" | "vendredi" | "ven" => 5,
        "6" | "saturday" | "sat" | "samedi" | "sam" => 6,
        _ => return None,
    };
    Some(day)
}

fn parse_entry(entry: &Value) -> Vec<TimeSegment> {
    match entry {
        Value::String(text) => parse_text(text),
        Value::Array(items) => items.iter().flat_map(parse_entry).collect(),
        Value::Object(map) => parse_structured(map),
        _ => Vec::new(),
    }
}

fn parse_structured(map: &Map<String, Value>) -> Vec<TimeSegment> {
    if matches!(map.get("closed"), Some(Value::Bool(true))) {
        return Vec::new();
    }

    let open = first_token(map, &OPEN_KEYS);
    let close = first_token(map, &CLOSE_KEYS);
    if let (Some(open), Some(close)) = (open, close) {
        return match (parse_time_token(&open), parse_time_token(&close)) {
            (Some(start), Some(end)) => vec![TimeSegment::new(start, end)],
            _ => Vec::new(),
        };
    }

    match map.get("label") {
        Some(Value::String(label)) => parse_text(label),
        _ => Vec::new(),
    }
}

fn first_token(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match map.get(*key)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

fn parse_text(text: &str) -> Vec<TimeSegment> {
    if is_closed_marker(text) {
        return Vec::new();
    }

    split_ranges(text)
        .iter()
        .filter_map(|range| {
            let (open, close) = range.split_once(RANGE_DELIMITERS)?;
            let start = parse_time_token(open)?;
            let end = parse_time_token(close)?;
            Some(TimeSegment::new(start, end))
        })
        .collect()
}

/// Splits on separator characters and on joining words such as "et" or "and".
fn split_ranges(text: &str) -> Vec<String> {
    let mut ranges = Vec::new();
    for chunk in text.split(RANGE_SEPARATORS) {
        let mut current: Vec<&str> = Vec::new();
        for word in chunk.split_whitespace() {
            if RANGE_JOINERS.contains(&word.to_lowercase().as_str()) {
                ranges.push(current.join(" "));
                current.clear();
            } else {
                current.push(word);
            }
        }
        ranges.push(current.join(" "));
    }
    ranges
}

fn is_closed_marker(text: &str) -> bool {
    let lowered = text.to_lowercase();
    lowered.contains("fermé")
        || lowered.contains("closed")
        || lowered
            .split(|c: char| !c.is_alphabetic())
            .any(|word| word == "ferme")
}

/// Parses "11h00", "11:30", "7pm", "7 p.m.", "23" into minutes since midnight.
/// Leading words such as a day name ("Lundi 11h00") are skipped.
fn parse_time_token(token: &str) -> Option<u16> {
    let lowered = token.to_lowercase();
    let first_clock_word = lowered
        .split_whitespace()
        .position(|word| word.starts_with(|c: char| c.is_ascii_digit()))?;
    let compact: String = lowered
        .split_whitespace()
        .skip(first_clock_word)
        .collect();

    let (clock, meridiem) = split_meridiem(&compact);
    let (hour_part, minute_part) = match clock.find(['h', ':']) {
        Some(idx) => (&clock[..idx], &clock[idx + 1..]),
        None => (clock, ""),
    };

    let mut hour = leading_number(hour_part)?;
    let minute = leading_number(minute_part).unwrap_or(0);

    match meridiem {
        Some(Meridiem::Pm) if hour < 12 => hour += 12,
        Some(Meridiem::Am) if hour == 12 => hour = 0,
        _ => {}
    }

    let hour = hour.min(23) as u16;
    let minute = minute.min(59) as u16;
    Some(hour * 60 + minute)
}

fn split_meridiem(text: &str) -> (&str, Option<Meridiem>) {
    for (suffix, meridiem) in [
        ("p.m.", Meridiem::Pm),
        ("p.m", Meridiem::Pm),
        ("pm", Meridiem::Pm),
        ("a.m.", Meridiem::Am),
        ("a.m", Meridiem::Am),
        ("am", Meridiem::Am),
    ] {
        if let Some(clock) = text.strip_suffix(suffix) {
            return (clock, Some(meridiem));
        }
    }
    (text, None)
}

fn leading_number(text: &str) -> Option<u64> {
    let digits: String = text.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse::<u64>().unwrap_or(u64::MAX))
}
