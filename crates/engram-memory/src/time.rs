// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Normalization of relative and implicit time expressions.
//!
//! Maps analyzer time expressions ("yesterday", "2026/08/01", "上周") to a
//! canonical `YYYY-MM-DD` date. The `"now"` marker and the empty string pass
//! through unchanged. Anything unparseable degrades to the current date,
//! never an error: callers must not assume the returned date reflects the
//! original semantic time.

use chrono::{Days, Months, NaiveDate, Utc};

/// Marker signalling a conclusive/milestone statement rather than a date.
pub const NOW_MARKER: &str = "now";

/// Canonical output format.
const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Alternate date formats accepted from the analyzer, tried in order.
const ALTERNATE_FORMATS: &[&str] = &["%Y/%m/%d", "%Y.%m.%d", "%m/%d/%Y", "%d-%m-%Y"];

/// Normalize a raw time expression against the current date.
pub fn normalize(raw: &str) -> String {
    normalize_at(raw, Utc::now().date_naive())
}

/// Normalize a raw time expression against an explicit `today`.
///
/// Idempotent: the output is always `""`, `"now"`, or a canonical
/// `YYYY-MM-DD` string, each of which normalizes to itself.
pub fn normalize_at(raw: &str, today: NaiveDate) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NOW_MARKER {
        return trimmed.to_string();
    }

    if let Some(date) = relative_offset(trimmed, today) {
        return date.format(CANONICAL_FORMAT).to_string();
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, CANONICAL_FORMAT) {
        return date.format(CANONICAL_FORMAT).to_string();
    }

    for format in ALTERNATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.format(CANONICAL_FORMAT).to_string();
        }
    }

    // Lossy fallback: unparseable expressions become the current date.
    today.format(CANONICAL_FORMAT).to_string()
}

/// Map known relative phrases (and localized equivalents) to a date.
fn relative_offset(expression: &str, today: NaiveDate) -> Option<NaiveDate> {
    match expression.to_lowercase().as_str() {
        "today" | "今天" => Some(today),
        "yesterday" | "昨天" => today.checked_sub_days(Days::new(1)),
        "last week" | "上周" | "上週" => today.checked_sub_days(Days::new(7)),
        "last month" | "上个月" | "上個月" => today.checked_sub_months(Months::new(1)),
        _ => None,
    }
}

/// True when the expression is the `"now"` milestone marker.
pub fn is_now_marker(expression: &str) -> bool {
    expression.trim() == NOW_MARKER
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn now_and_empty_pass_through() {
        let today = day(2026, 8, 25);
        assert_eq!(normalize_at("now", today), "now");
        assert_eq!(normalize_at("", today), "");
        assert_eq!(normalize_at("  now  ", today), "now");
    }

    #[test]
    fn relative_phrases_map_to_offsets() {
        let today = day(2026, 8, 25);
        assert_eq!(normalize_at("today", today), "2026-08-25");
        assert_eq!(normalize_at("yesterday", today), "2026-08-24");
        assert_eq!(normalize_at("last week", today), "2026-08-18");
        assert_eq!(normalize_at("last month", today), "2026-07-25");
    }

    #[test]
    fn localized_phrases_map_to_offsets() {
        let today = day(2026, 8, 25);
        assert_eq!(normalize_at("昨天", today), "2026-08-24");
        assert_eq!(normalize_at("今天", today), "2026-08-25");
        assert_eq!(normalize_at("上周", today), "2026-08-18");
        assert_eq!(normalize_at("上个月", today), "2026-07-25");
    }

    #[test]
    fn canonical_dates_pass_through() {
        let today = day(2026, 8, 25);
        assert_eq!(normalize_at("2025-12-31", today), "2025-12-31");
    }

    #[test]
    fn alternate_formats_are_canonicalized() {
        let today = day(2026, 8, 25);
        assert_eq!(normalize_at("2025/12/31", today), "2025-12-31");
        assert_eq!(normalize_at("2025.12.31", today), "2025-12-31");
        assert_eq!(normalize_at("12/31/2025", today), "2025-12-31");
        assert_eq!(normalize_at("31-12-2025", today), "2025-12-31");
    }

    #[test]
    fn unparseable_degrades_to_today() {
        let today = day(2026, 8, 25);
        assert_eq!(normalize_at("sometime soon", today), "2026-08-25");
        assert_eq!(normalize_at("q3 planning", today), "2026-08-25");
    }

    #[test]
    fn normalize_is_idempotent() {
        let today = day(2026, 8, 25);
        for input in [
            "now",
            "",
            "yesterday",
            "last month",
            "2025/12/31",
            "total nonsense",
            "昨天",
        ] {
            let once = normalize_at(input, today);
            let twice = normalize_at(&once, today);
            assert_eq!(once, twice, "normalize should be idempotent for {input:?}");
        }
    }

    #[test]
    fn month_subtraction_clamps_to_valid_dates() {
        // March 31 minus one month clamps to the end of February.
        let today = day(2026, 3, 31);
        assert_eq!(normalize_at("last month", today), "2026-02-28");
    }

    #[test]
    fn is_now_marker_detects_marker_only() {
        assert!(is_now_marker("now"));
        assert!(is_now_marker(" now "));
        assert!(!is_now_marker("nowadays"));
        assert!(!is_now_marker(""));
    }
}
