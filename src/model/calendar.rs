//! Calendar-day arithmetic.
//!
//! Every date the planner touches is a UTC calendar day represented as a
//! [`NaiveDate`]. Layout indices, durations and exports all go through the
//! helpers here so there is exactly one day-indexing scheme.

use chrono::{NaiveDate, TimeDelta, Utc};

/// Parse a zero-padded `YYYY-MM-DD` string. Anything else, including signs,
/// short fields and zero-valued components, yields `None`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let bytes = text.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| if i == 4 || i == 7 { *b == b'-' } else { b.is_ascii_digit() });
    if !well_formed {
        return None;
    }
    let year: i32 = text[..4].parse().ok()?;
    let month: u32 = text[5..7].parse().ok()?;
    let day: u32 = text[8..].parse().ok()?;
    if year == 0 || month == 0 || day == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Format a day as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Whole days from `a` to `b` (negative when `b` is earlier).
pub fn day_difference(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days()
}

/// Clamp `value` into `[min, max]`. When `min > max` the lower bound wins.
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    let upper = if value > max { max } else { value };
    if upper < min {
        min
    } else {
        upper
    }
}

/// Shift a day by `days`, saturating at the representable calendar bounds.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    TimeDelta::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

/// Today's UTC calendar day.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// `Feb 2026`
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// `Feb 05`
pub fn month_day_label(date: NaiveDate) -> String {
    date.format("%b %d").to_string()
}

/// Two-digit day of month, e.g. `05`.
pub fn day_of_month_label(date: NaiveDate) -> String {
    date.format("%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_iso_days() {
        assert_eq!(parse_date("2026-02-05"), Some(d(2026, 2, 5)));
        assert_eq!(parse_date(" 2024-02-29 "), Some(d(2024, 2, 29)));
    }

    #[test]
    fn rejects_malformed_or_zero_components() {
        for bad in ["", "2026", "2026-02", "2026-00-10", "2026-02-00", "0-01-01", "abcd-ef-gh", "2026-02-30", "2026-02-05-1"] {
            assert_eq!(parse_date(bad), None, "{bad:?} should not parse");
        }
    }

    #[test]
    fn rejects_unpadded_or_signed_days() {
        for bad in ["2026-2-5", "2026-02-5", "+2026-01-01", "-2026-01-01", "2026-+1-01", "20260-1-01", "2026/02/05"] {
            assert_eq!(parse_date(bad), None, "{bad:?} should not parse");
        }
    }

    #[test]
    fn format_round_trips() {
        for text in ["2026-02-05", "1999-12-31", "2024-02-29", "2030-01-01"] {
            let parsed = parse_date(text).unwrap();
            assert_eq!(format_date(parsed), text);
        }
    }

    #[test]
    fn day_difference_is_antisymmetric() {
        let pairs = [
            (d(2026, 2, 1), d(2026, 2, 14)),
            (d(2026, 3, 28), d(2026, 3, 30)),
            (d(2025, 12, 31), d(2026, 1, 1)),
            (d(2026, 5, 5), d(2026, 5, 5)),
        ];
        for (a, b) in pairs {
            assert_eq!(day_difference(a, b), -day_difference(b, a));
        }
        assert_eq!(day_difference(d(2026, 2, 1), d(2026, 2, 14)), 13);
    }

    #[test]
    fn clamp_prefers_lower_bound_when_inverted() {
        assert_eq!(clamp(5, 0, 10), 5);
        assert_eq!(clamp(-3, 0, 10), 0);
        assert_eq!(clamp(12, 0, 10), 10);
        assert_eq!(clamp(6, 5, 3), 5);
    }

    #[test]
    fn labels() {
        assert_eq!(month_label(d(2026, 2, 14)), "Feb 2026");
        assert_eq!(month_day_label(d(2026, 2, 5)), "Feb 05");
        assert_eq!(day_of_month_label(d(2026, 2, 5)), "05");
        assert_eq!(add_days(d(2026, 2, 27), 3), d(2026, 3, 2));
    }

    #[test]
    fn add_days_saturates_on_huge_deltas() {
        let day = d(2026, 2, 5);
        assert_eq!(add_days(day, i64::MAX), NaiveDate::MAX);
        assert_eq!(add_days(day, i64::MIN), NaiveDate::MIN);
        assert_eq!(add_days(day, 1_000_000_000), NaiveDate::MAX);
        assert_eq!(add_days(day, -1_000_000_000), NaiveDate::MIN);
    }
}
