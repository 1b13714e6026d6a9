//! Calendar-date helpers shared by the availability reconciler and the
//! booking UI. Everything here works on plain `YYYY-MM-DD` strings so the
//! same code runs natively (tests) and in the browser.

use chrono::{Datelike, NaiveDate};

/// Format year/month/day as a fixed-width `YYYY-MM-DD` string.
///
/// The fixed width and zero padding are what make string comparison a valid
/// date comparison elsewhere in the crate.
pub fn format_date(year: i32, month: u32, day: u32) -> String {
    format!("{:04}-{:02}-{:02}", year, month, day)
}

/// Parse a `YYYY-MM-DD` string into components, with basic range checks.
pub fn parse_date_string(date_str: &str) -> Option<(i32, u32, u32)> {
    let parts: Vec<&str> = date_str.split('-').collect();
    if parts.len() != 3 {
        return None;
    }

    let year = parts[0].parse::<i32>().ok()?;
    let month = parts[1].parse::<u32>().ok()?;
    let day = parts[2].parse::<u32>().ok()?;

    if (1..=12).contains(&month) && (1..=31).contains(&day) {
        Some((year, month, day))
    } else {
        None
    }
}

/// Check if a year is a leap year
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Get days in a month (accounting for leap years)
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

/// Weekday index for the first of a month (0 = Sunday, 1 = Monday, etc.)
pub fn first_weekday_of_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(first.weekday().num_days_from_sunday())
}

/// Weekday index (0 = Sunday .. 6 = Saturday) for a `YYYY-MM-DD` string.
pub fn weekday_of(date_str: &str) -> Option<u32> {
    let (year, month, day) = parse_date_string(date_str)?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(date.weekday().num_days_from_sunday())
}

/// Format a `YYYY-MM-DD` string for display (e.g., "January 15, 2026")
pub fn format_date_for_display(date_str: &str) -> String {
    if let Some((year, month, day)) = parse_date_string(date_str) {
        format!("{} {}, {}", month_name(month), day, year)
    } else {
        date_str.to_string()
    }
}

/// English month name for a 1-based month number.
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "January",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_is_fixed_width() {
        assert_eq!(format_date(2026, 2, 3), "2026-02-03");
        assert_eq!(format_date(2026, 12, 31), "2026-12-31");
    }

    #[test]
    fn test_parse_date_string() {
        assert_eq!(parse_date_string("2026-02-23"), Some((2026, 2, 23)));
        assert_eq!(parse_date_string("2026-13-01"), None);
        assert_eq!(parse_date_string("2026-00-01"), None);
        assert_eq!(parse_date_string("2026-01-32"), None);
        assert_eq!(parse_date_string("not-a-date"), None);
        assert_eq!(parse_date_string("2026-01"), None);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2026, 1), 31);
        assert_eq!(days_in_month(2026, 4), 30);
        assert_eq!(days_in_month(2026, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
    }

    #[test]
    fn test_weekday_of() {
        // 2026-02-23 is a Monday
        assert_eq!(weekday_of("2026-02-23"), Some(1));
        // 2026-03-01 is a Sunday
        assert_eq!(weekday_of("2026-03-01"), Some(0));
        assert_eq!(weekday_of("garbage"), None);
    }

    #[test]
    fn test_first_weekday_of_month() {
        // February 2026 starts on a Sunday
        assert_eq!(first_weekday_of_month(2026, 2), Some(0));
        // August 2026 starts on a Saturday
        assert_eq!(first_weekday_of_month(2026, 8), Some(6));
        assert_eq!(first_weekday_of_month(2026, 13), None);
    }

    #[test]
    fn test_format_date_for_display() {
        assert_eq!(format_date_for_display("2026-02-23"), "February 23, 2026");
        assert_eq!(format_date_for_display("oops"), "oops");
    }
}
