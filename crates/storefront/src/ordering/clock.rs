use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Utc};
use serde::Deserialize;

/// Store-local wall clock. Calculators never read it; only callers that omit a time do.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreClock {
    offset: Option<FixedOffset>,
}

impl StoreClock {
    pub fn new(offset: Option<FixedOffset>) -> Self {
        Self { offset }
    }

    pub fn now(&self) -> NaiveDateTime {
        match self.offset {
            Some(offset) => Utc::now().with_timezone(&offset).naive_local(),
            None => Local::now().naive_local(),
        }
    }

    pub fn resolve(&self, at: Option<NaiveDateTime>) -> NaiveDateTime {
        at.unwrap_or_else(|| self.now())
    }
}

/// Accepts RFC 3339 (keeping its local wall-clock part) or a naive `YYYY-MM-DDTHH:MM[:SS]`.
pub fn parse_local_time(raw: &str) -> Result<NaiveDateTime, String> {
    let trimmed = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(with_offset.naive_local());
    }

    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| format!("failed to parse '{raw}' as a local date and time"))
}

pub fn deserialize_optional_local_time<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_local_time(&value).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 6)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .expect("valid timestamp")
    }

    #[test]
    fn parses_supported_formats() {
        assert_eq!(parse_local_time("2025-10-06T15:00"), Ok(monday_at(15, 0)));
        assert_eq!(parse_local_time("2025-10-06 15:00:00"), Ok(monday_at(15, 0)));
        assert_eq!(
            parse_local_time("2025-10-06T15:00:00-04:00"),
            Ok(monday_at(15, 0))
        );
    }

    #[test]
    fn rejects_dates_without_time() {
        assert!(parse_local_time("2025-10-06").is_err());
        assert!(parse_local_time("tomorrow").is_err());
    }

    #[test]
    fn resolve_prefers_explicit_time() {
        let clock = StoreClock::new(FixedOffset::east_opt(0));
        assert_eq!(clock.resolve(Some(monday_at(9, 30))), monday_at(9, 30));
    }
}
