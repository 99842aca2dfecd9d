//! Month key handling
//!
//! The canonical time axis is the 7-character `YYYY-MM` string. Its lexical
//! sort order equals chronological order, which the aggregator relies on.

/// Check that a string is a well-formed `YYYY-MM` month key
pub fn is_valid_month_key(key: &str) -> bool {
    let bytes = key.as_bytes();
    if bytes.len() != 7 || bytes[4] != b'-' {
        return false;
    }
    if !bytes[..4].iter().all(|b| b.is_ascii_digit())
        || !bytes[5..].iter().all(|b| b.is_ascii_digit())
    {
        return false;
    }
    matches!(&key[5..7], "01" | "02" | "03" | "04" | "05" | "06" | "07" | "08" | "09" | "10" | "11" | "12")
}

/// Short calendar-month label for a month key ("2026-01" -> "Jan")
///
/// Falls back to the raw key when the month part is out of range, so a
/// malformed row degrades the chart axis instead of breaking the response.
pub fn month_label(key: &str) -> String {
    let name = match key.get(5..7) {
        Some("01") => "Jan",
        Some("02") => "Feb",
        Some("03") => "Mar",
        Some("04") => "Apr",
        Some("05") => "May",
        Some("06") => "Jun",
        Some("07") => "Jul",
        Some("08") => "Aug",
        Some("09") => "Sep",
        Some("10") => "Oct",
        Some("11") => "Nov",
        Some("12") => "Dec",
        _ => return key.to_string(),
    };
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_keys() {
        assert!(is_valid_month_key("2026-01"));
        assert!(is_valid_month_key("1999-12"));
        assert!(is_valid_month_key("2026-09"));
    }

    #[test]
    fn test_invalid_keys() {
        assert!(!is_valid_month_key("2026-13"));
        assert!(!is_valid_month_key("2026-00"));
        assert!(!is_valid_month_key("2026-1"));
        assert!(!is_valid_month_key("2026/01"));
        assert!(!is_valid_month_key("202601"));
        assert!(!is_valid_month_key(""));
        assert!(!is_valid_month_key("26-01-01"));
    }

    #[test]
    fn test_month_labels() {
        assert_eq!(month_label("2026-01"), "Jan");
        assert_eq!(month_label("2026-02"), "Feb");
        assert_eq!(month_label("2025-11"), "Nov");
        assert_eq!(month_label("2025-12"), "Dec");
    }

    #[test]
    fn test_label_fallback_on_garbage() {
        assert_eq!(month_label("2026-99"), "2026-99");
        assert_eq!(month_label("bad"), "bad");
    }

    #[test]
    fn test_lexical_order_is_chronological() {
        let mut keys = vec!["2026-02", "2025-12", "2026-01", "2025-11"];
        keys.sort();
        assert_eq!(keys, vec!["2025-11", "2025-12", "2026-01", "2026-02"]);
    }
}
