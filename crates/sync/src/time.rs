//! Timestamp conventions.
//!
//! All persisted timestamps are UTC RFC-3339 with exactly millisecond
//! precision. The fixed width makes lexicographic order equal chronological
//! order, which is what lets the merge guard compare `updated_at` as text.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

/// Server clock, truncated to the persisted precision.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Default `since` when a device has never synced.
pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// Persisted form: `2024-01-01T10:00:00.000Z`.
pub fn fmt(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse(s: &str) -> chrono::format::ParseResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fmt_is_fixed_width_and_ordered() {
        let early = Utc.with_ymd_and_hms(2024, 1, 2, 11, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        let (a, b) = (fmt(&early), fmt(&late));
        assert_eq!(a.len(), b.len());
        assert!(a < b);
        assert_eq!(a, "2024-01-02T11:00:00.000Z");
    }

    #[test]
    fn round_trips() {
        let ts = now();
        assert_eq!(parse(&fmt(&ts)).unwrap(), ts);
    }

    #[test]
    fn epoch_formats_before_everything() {
        assert_eq!(fmt(&epoch()), "1970-01-01T00:00:00.000Z");
    }
}
