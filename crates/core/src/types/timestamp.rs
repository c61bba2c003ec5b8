//! Wire timestamps.

use core::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Naive layouts the backend is known to emit without an offset.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// A timestamp exactly as it arrived over the wire.
///
/// The backend stores UTC but does not always append an offset, and old
/// records can carry junk. Keeping the raw string means a bad value never
/// fails deserialization of the surrounding record; callers ask for the
/// instant with [`Timestamp::to_utc`] and decide what to do with `None`.
///
/// ## Examples
///
/// ```
/// use atende_core::Timestamp;
///
/// assert!(Timestamp::from("2021-03-01T10:00:00Z").to_utc().is_some());
/// assert!(Timestamp::from("2021-03-01T10:00:00.123456").to_utc().is_some());
/// assert!(Timestamp::from("yesterday-ish").to_utc().is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    /// Returns the raw string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Normalize to a UTC instant.
    ///
    /// Values with an explicit offset are converted; naive values are taken
    /// to already be UTC. Returns `None` when nothing matches.
    #[must_use]
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.0.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }

        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|naive| naive.and_utc())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Timestamp {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

impl From<String> for Timestamp {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self(instant.to_rfc3339())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_rfc3339_with_offset_is_normalized() {
        let ts = Timestamp::from("2021-03-01T10:00:00-03:00");
        let expected = Utc.with_ymd_and_hms(2021, 3, 1, 13, 0, 0).unwrap();
        assert_eq!(ts.to_utc(), Some(expected));
    }

    #[test]
    fn test_naive_is_read_as_utc() {
        let ts = Timestamp::from("2021-03-01T10:00:00");
        let expected = Utc.with_ymd_and_hms(2021, 3, 1, 10, 0, 0).unwrap();
        assert_eq!(ts.to_utc(), Some(expected));
    }

    #[test]
    fn test_fractional_and_space_separated() {
        assert!(Timestamp::from("2021-03-01T10:00:00.000123").to_utc().is_some());
        assert!(Timestamp::from("2021-03-01 10:00:00").to_utc().is_some());
    }

    #[test]
    fn test_garbage_and_empty() {
        assert_eq!(Timestamp::from("").to_utc(), None);
        assert_eq!(Timestamp::from("   ").to_utc(), None);
        assert_eq!(Timestamp::from("31/12/2020").to_utc(), None);
    }

    #[test]
    fn test_from_instant_round_trips() {
        let instant = Utc.with_ymd_and_hms(2022, 7, 4, 8, 30, 0).unwrap();
        assert_eq!(Timestamp::from(instant).to_utc(), Some(instant));
    }
}
