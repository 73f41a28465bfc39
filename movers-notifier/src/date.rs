//! Target trading date resolution.

use chrono::NaiveDate;

/// Resolve the `YYYYMMDD` date to query.
///
/// A present, non-empty override is returned verbatim, whitespace included;
/// no calendar validation is done. Otherwise `today` is formatted as `YYYYMMDD`.
pub fn resolve_target_date(override_date: Option<&str>, today: NaiveDate) -> String {
    match override_date {
        Some(date) if !date.is_empty() => date.to_string(),
        _ => today.format("%Y%m%d").to_string(),
    }
}

/// Today's date in the local timezone.
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Insert hyphens into an 8-digit date (`20240105` -> `2024-01-05`).
///
/// Anything that is not exactly 8 ASCII characters is returned unchanged.
pub fn display_date(yyyymmdd: &str) -> String {
    if yyyymmdd.len() != 8 || !yyyymmdd.is_ascii() {
        return yyyymmdd.to_string();
    }

    format!(
        "{}-{}-{}",
        &yyyymmdd[..4],
        &yyyymmdd[4..6],
        &yyyymmdd[6..]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_override_used_verbatim() {
        assert_eq!(resolve_target_date(Some("20240105"), day(2026, 10, 19)), "20240105");
        // No calendar validation
        assert_eq!(resolve_target_date(Some("20241345"), day(2026, 10, 19)), "20241345");
    }

    #[test]
    fn test_missing_or_empty_override_uses_today() {
        assert_eq!(resolve_target_date(None, day(2024, 1, 5)), "20240105");
        assert_eq!(resolve_target_date(Some(""), day(2024, 1, 5)), "20240105");
    }

    #[test]
    fn test_whitespace_override_is_not_trimmed() {
        assert_eq!(resolve_target_date(Some("   "), day(2024, 12, 31)), "   ");
        assert_eq!(resolve_target_date(Some(" 20240105"), day(2024, 12, 31)), " 20240105");
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("20240105"), "2024-01-05");
        assert_eq!(display_date("2024015"), "2024015");
        assert_eq!(display_date("2024년1월5"), "2024년1월5");
    }
}
