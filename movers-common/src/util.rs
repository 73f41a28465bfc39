//! Text and number formatting helpers.

/// KRW per 억 (hundred million).
pub const KRW_PER_EOK: u64 = 100_000_000;

/// Number of characters (Unicode scalar values) in a string.
///
/// Message limits and column padding are measured in characters, not bytes.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Safe for multi-byte text (Hangul, emoji): cuts on character boundaries.
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => {
            let truncated = &s[..idx];
            format!("{}...", truncated.trim_end())
        }
        None => s.to_string(),
    }
}

/// Format an integer with comma thousands separators (`1234567` -> `1,234,567`).
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// Format a count of tenths as a one-decimal number with thousands separators.
///
/// `12345` -> `1,234.5`
pub fn format_tenths(tenths: u64) -> String {
    format!("{}.{}", format_thousands(tenths / 10), tenths % 10)
}

/// Convert KRW to 억, rounded half-up to one decimal place, as a count of tenths.
///
/// Integer arithmetic keeps the rounding exact: `52_345_000_000` -> `5235` (523.5억).
pub fn krw_to_eok_tenths(krw: u64) -> u64 {
    let tenth = KRW_PER_EOK / 10;
    krw / tenth + u64::from(krw % tenth >= tenth / 2)
}

/// Human label for a KRW amount in 억, dropping a trailing `.0`.
///
/// `50_000_000_000` -> `500`, `12_345_000_000` -> `123.5`
pub fn format_eok(krw: u64) -> String {
    let tenths = krw_to_eok_tenths(krw);
    if tenths % 10 == 0 {
        format_thousands(tenths / 10)
    } else {
        format_tenths(tenths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, "0")]
    #[test_case(999, "999")]
    #[test_case(1_000, "1,000")]
    #[test_case(71_500, "71,500")]
    #[test_case(1_234_567, "1,234,567")]
    #[test_case(50_000_000_000, "50,000,000,000")]
    fn test_format_thousands(value: u64, expected: &str) {
        assert_eq!(format_thousands(value), expected);
    }

    #[test_case(0, "0.0")]
    #[test_case(5, "0.5")]
    #[test_case(5235, "523.5")]
    #[test_case(123_456, "12,345.6")]
    fn test_format_tenths(tenths: u64, expected: &str) {
        assert_eq!(format_tenths(tenths), expected);
    }

    #[test_case(50_000_000_000, 5000 ; "exact")]
    #[test_case(52_345_000_000, 5235 ; "half rounds up")]
    #[test_case(52_344_999_999, 5234 ; "just below half")]
    #[test_case(1_234_567_890_123, 123_457 ; "large")]
    fn test_krw_to_eok_tenths(krw: u64, expected: u64) {
        assert_eq!(krw_to_eok_tenths(krw), expected);
    }

    #[test]
    fn test_format_eok() {
        assert_eq!(format_eok(50_000_000_000), "500");
        assert_eq!(format_eok(12_345_000_000), "123.5");
        assert_eq!(format_eok(1_000_000_000_000), "10,000");
    }

    #[test]
    fn test_char_len_counts_characters() {
        assert_eq!(char_len("삼성전자"), 4);
        assert_eq!("삼성전자".len(), 12);
        assert_eq!(char_len("━━━"), 3);
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("hello", 10), "hello");
        assert_eq!(truncate_with_ellipsis("hello world", 5), "hello...");
        assert_eq!(truncate_with_ellipsis("삼성전자우", 4), "삼성전자...");
        assert_eq!(truncate_with_ellipsis("", 10), "");
    }
}
