//! Browser-clock date helpers. The pure calendar math lives in
//! `shared::dates`; only "what is today, here" needs `js_sys::Date`.

pub use shared::dates::{days_in_month, format_date_for_display, month_name, parse_date_string};

/// Get the current local date in YYYY-MM-DD format
pub fn today_string() -> String {
    use js_sys::Date;
    let now = Date::new_0();
    let year = now.get_full_year();
    let month = now.get_month() + 1; // JavaScript months are 0-indexed
    let day = now.get_date();

    shared::dates::format_date(year as i32, month, day)
}

/// Current month/year for initializing calendar navigation.
pub fn current_month_year() -> (u32, i32) {
    use js_sys::Date;
    let now = Date::new_0();
    (now.get_month() + 1, now.get_full_year() as i32)
}

/// Current instant as an RFC 3339 string, used to stamp optimistic sends.
pub fn now_iso() -> String {
    js_sys::Date::new_0()
        .to_iso_string()
        .as_string()
        .unwrap_or_default()
}
