//! Transaction date parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Accepted date-only formats.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

/// Accepted datetime formats; only the date part is kept.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a transaction date.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYYMMDD` and ISO 8601 datetimes
/// (with or without an offset), whose date part is used.
pub fn parse_transaction_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(date) = try_parse_date(trimmed) {
        return Some(date);
    }

    if let Some(dt) = try_parse_datetime(trimmed) {
        return Some(dt.date());
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.date_naive())
}

fn try_parse_date(value: &str) -> Option<NaiveDate> {
    // `%Y%m%d` would otherwise accept longer digit runs.
    if value.len() == 8 && !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

fn try_parse_datetime(value: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn date_formats() {
        assert_eq!(parse_transaction_date("2023-03-07"), ymd(2023, 3, 7));
        assert_eq!(parse_transaction_date("2023/03/07"), ymd(2023, 3, 7));
        assert_eq!(parse_transaction_date("20230307"), ymd(2023, 3, 7));
    }

    #[test]
    fn datetimes_keep_the_date_part() {
        assert_eq!(parse_transaction_date("2023-03-07T23:15:00"), ymd(2023, 3, 7));
        assert_eq!(parse_transaction_date("2023-03-07 08:00"), ymd(2023, 3, 7));
        assert_eq!(
            parse_transaction_date("2023-03-07T23:15:00+02:00"),
            ymd(2023, 3, 7)
        );
    }

    #[test]
    fn rejects_invalid_dates() {
        assert_eq!(parse_transaction_date(""), None);
        assert_eq!(parse_transaction_date("2023-02-30"), None);
        assert_eq!(parse_transaction_date("07/03/2023"), None);
        assert_eq!(parse_transaction_date("yesterday"), None);
    }
}
