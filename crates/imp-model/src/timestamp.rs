//! Serde helpers for timestamps sent by the backend.
//!
//! The backend writes local date-times without an offset
//! (`2024-05-01T10:00:00`); those are read as UTC. Values are always
//! written as RFC 3339.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

/// Parses RFC 3339 or an offset-less `YYYY-MM-DDTHH:MM:SS[.fff]`.
pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_offsetless_backend_value() {
        let dt = parse("2024-05-01T10:00:00.123456").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-05-01T10:00:00.123456+00:00");
        assert!(parse("2024-05-01T10:00:00+03:00").is_some());
        assert!(parse("yesterday").is_none());
    }
}
