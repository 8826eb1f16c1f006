use chrono::{DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use recon_core::Money;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::csv::CsvError;

/// Offset-free layouts, read as wall-clock time in the run's timezone.
const LOCAL_LAYOUTS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H.%M"];

/// Parses a monetary string into integer cents.
///
/// Blank input is zero. Precision past the cent is truncated, not rounded.
pub fn parse_cents(s: &str) -> Result<i64, CsvError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(0);
    }

    let (negative, body) = match s.strip_prefix('(').and_then(|b| b.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, s),
    };
    let mut cleaned = body.replace([',', '$', ' '], "");
    if cleaned.ends_with('.') {
        cleaned.push('0');
    }

    let mut dec =
        Decimal::from_str(&cleaned).map_err(|_| CsvError::InvalidAmount(s.to_string()))?;
    if negative {
        dec = -dec;
    }
    Money::from_decimal(dec)
        .to_cents()
        .ok_or_else(|| CsvError::InvalidAmount(s.to_string()))
}

/// Parses a transaction timestamp and expresses it in `tz`.
///
/// RFC 3339 input keeps its instant; other layouts are taken as local time
/// in `tz`. A local time that falls in a DST fold resolves to the earlier
/// instant; one that falls in a DST gap is rejected.
pub fn parse_timestamp(s: &str, tz: &Tz) -> Result<DateTime<FixedOffset>, CsvError> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(tz).fixed_offset());
    }

    let naive = LOCAL_LAYOUTS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .ok_or_else(|| CsvError::InvalidTimestamp(s.to_string()))?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.fixed_offset()),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.fixed_offset()),
        LocalResult::None => Err(CsvError::InvalidTimestamp(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    // ── parse_cents ───────────────────────────────────────────────────────────

    #[test]
    fn parse_cents_plain() {
        assert_eq!(parse_cents("100.00").unwrap(), 10000);
        assert_eq!(parse_cents("123.45").unwrap(), 12345);
    }

    #[test]
    fn parse_cents_negative() {
        assert_eq!(parse_cents("-50.00").unwrap(), -5000);
    }

    #[test]
    fn parse_cents_blank_is_zero() {
        assert_eq!(parse_cents("").unwrap(), 0);
        assert_eq!(parse_cents("   ").unwrap(), 0);
    }

    #[test]
    fn parse_cents_whole_and_single_digit_fraction() {
        assert_eq!(parse_cents("100").unwrap(), 10000);
        assert_eq!(parse_cents("1.5").unwrap(), 150);
        assert_eq!(parse_cents("7.").unwrap(), 700);
    }

    #[test]
    fn parse_cents_truncates_extra_precision() {
        assert_eq!(parse_cents("1.999").unwrap(), 199);
        assert_eq!(parse_cents("-1.999").unwrap(), -199);
    }

    #[test]
    fn parse_cents_statement_formatting() {
        assert_eq!(parse_cents("$1,234.56").unwrap(), 123456);
        assert_eq!(parse_cents("(75.25)").unwrap(), -7525);
    }

    #[test]
    fn parse_cents_invalid() {
        assert!(matches!(parse_cents("abc"), Err(CsvError::InvalidAmount(_))));
        assert!(parse_cents("12.3.4").is_err());
    }

    // ── parse_timestamp ───────────────────────────────────────────────────────

    #[test]
    fn rfc3339_is_converted_into_zone() {
        let dt = parse_timestamp("2025-01-02T20:00:00Z", &chrono_tz::Asia::Jakarta).unwrap();
        // UTC+7 pushes this into the next local day.
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2025, 1, 3).unwrap());
        assert_eq!(dt.hour(), 3);
        assert_eq!(dt.offset().local_minus_utc(), 7 * 3600);
    }

    #[test]
    fn rfc3339_with_fraction() {
        let dt = parse_timestamp("2025-01-02T10:00:00.123456789Z", &Tz::UTC).unwrap();
        assert_eq!(dt.nanosecond(), 123_456_789);
    }

    #[test]
    fn local_layouts_use_zone_wall_clock() {
        let dt = parse_timestamp("2025-01-02 23:59:59", &chrono_tz::Asia::Jakarta).unwrap();
        assert_eq!(dt.day(), 2);
        assert_eq!(dt.hour(), 23);
        assert_eq!(dt.offset().local_minus_utc(), 7 * 3600);

        let dt = parse_timestamp("2025-01-02 15.04", &Tz::UTC).unwrap();
        assert_eq!((dt.hour(), dt.minute()), (15, 4));
    }

    #[test]
    fn date_only_is_local_midnight() {
        let dt = parse_timestamp("2025-01-02", &Tz::UTC).unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn dst_gap_is_rejected() {
        // 02:30 does not exist in New York on 2025-03-09.
        let result = parse_timestamp("2025-03-09 02:30:00", &chrono_tz::America::New_York);
        assert!(matches!(result, Err(CsvError::InvalidTimestamp(_))));
    }

    #[test]
    fn dst_fold_takes_earlier_instant() {
        // 01:30 happens twice in New York on 2025-11-02; EDT comes first.
        let dt = parse_timestamp("2025-11-02 01:30:00", &chrono_tz::America::New_York).unwrap();
        assert_eq!(dt.offset().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn garbage_timestamp() {
        assert!(parse_timestamp("yesterday", &Tz::UTC).is_err());
    }
}
