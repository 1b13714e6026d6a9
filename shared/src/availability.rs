//! Availability reconciler: turns the two independent availability signals a
//! lawyer publishes — itemized blocked date ranges and a recurring weekly
//! schedule — into a single boolean-per-date predicate for the booking
//! calendar, with no timezone drift between UTC-stamped ranges and the
//! viewer's local calendar.
//!
//! The contract is one pass over the blocked periods, one pass over the
//! weekday map, and an O(1) per-day query thereafter; callers are expected to
//! build a [`Reconciler`] once per fetched schedule rather than per grid cell.

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::dates;
use crate::{BlockedPeriod, LawyerSchedule, WeeklyAvailability};

/// Expanded blocked-period data: the concrete calendar days covered, plus the
/// periods that could not be expanded.
///
/// Bad input never blocks a day (fail open toward bookable); instead the
/// offending period lands in `skipped` so the caller can log or alert on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockedDates {
    pub dates: HashSet<String>,
    pub skipped: Vec<BlockedPeriod>,
}

/// Expand blocked periods into the set of local `YYYY-MM-DD` strings they cover.
///
/// Each endpoint is truncated to its UTC calendar-date substring (time-of-day
/// and zone offset are discarded entirely) and re-read as a plain calendar
/// date, so a period spanning N calendar days always yields exactly N
/// entries no matter what zone or DST rules the viewer is under. Periods
/// whose endpoints fail to parse, or whose start falls after their end,
/// contribute nothing and are recorded in `skipped`.
pub fn build_blocked_date_set(periods: &[BlockedPeriod]) -> BlockedDates {
    let mut out = BlockedDates::default();

    for period in periods {
        let parsed = (
            parse_utc_date_part(&period.start_date),
            parse_utc_date_part(&period.end_date),
        );
        let (start, end) = match parsed {
            (Some(start), Some(end)) if start <= end => (start, end),
            _ => {
                out.skipped.push(period.clone());
                continue;
            }
        };

        // Walk by calendar-day increments, not fixed millisecond offsets.
        let mut day = start;
        while day <= end {
            out.dates.insert(day.format("%Y-%m-%d").to_string());
            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
    }

    out
}

fn parse_utc_date_part(stamp: &str) -> Option<NaiveDate> {
    let date_part = stamp.split('T').next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Derive the set of enabled weekday indices (0 = Sunday .. 6 = Saturday).
///
/// Returns `None` for an empty map, the sentinel for "no restriction, all
/// days open". Otherwise a configured day is enabled unless it says
/// `enabled: false` explicitly; day names that are not real weekdays are
/// ignored.
pub fn build_enabled_weekday_set(availability: &WeeklyAvailability) -> Option<HashSet<u32>> {
    if availability.is_empty() {
        return None;
    }

    let mut enabled = HashSet::new();
    for (day_name, schedule) in availability {
        if schedule.enabled == Some(false) {
            continue;
        }
        if let Some(index) = weekday_index(day_name) {
            enabled.insert(index);
        }
    }
    Some(enabled)
}

fn weekday_index(name: &str) -> Option<u32> {
    match name {
        "sunday" => Some(0),
        "monday" => Some(1),
        "tuesday" => Some(2),
        "wednesday" => Some(3),
        "thursday" => Some(4),
        "friday" => Some(5),
        "saturday" => Some(6),
        _ => None,
    }
}

/// Per-day bookability predicate built once from a fetched schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciler {
    blocked: BlockedDates,
    enabled_weekdays: Option<HashSet<u32>>,
}

impl Reconciler {
    pub fn new(schedule: &LawyerSchedule) -> Self {
        Self {
            blocked: build_blocked_date_set(&schedule.blocked_periods),
            enabled_weekdays: build_enabled_weekday_set(&schedule.weekly_availability),
        }
    }

    /// Periods that were dropped as unparseable or inverted during expansion.
    pub fn skipped_periods(&self) -> &[BlockedPeriod] {
        &self.blocked.skipped
    }

    /// True if booking is disallowed on the given local date.
    ///
    /// Blocked-date membership is checked before the weekday rule; both
    /// lookups are O(1).
    pub fn is_date_blocked(&self, date_string: &str, day_of_week: u32) -> bool {
        if self.blocked.dates.contains(date_string) {
            return true;
        }
        match &self.enabled_weekdays {
            Some(enabled) => !enabled.contains(&day_of_week),
            None => false,
        }
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(&LawyerSchedule::default())
    }
}

/// One cell of the 42-cell month grid, recomputed per render.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay {
    pub day: u32,
    /// Local `YYYY-MM-DD`
    pub date_string: String,
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: u32,
    /// Whether the cell belongs to the displayed month (vs. grid padding)
    pub in_month: bool,
    pub is_past: bool,
    pub is_blocked: bool,
    pub is_selected: bool,
    pub is_today: bool,
}

impl CalendarDay {
    /// A day can be booked iff it is neither blocked nor in the past;
    /// today itself is bookable.
    pub fn is_selectable(&self) -> bool {
        !self.is_blocked && !self.is_past
    }
}

/// Build the 42-cell grid (6 weeks, Sunday-first) for a displayed month.
///
/// `today` and `selected` are local `YYYY-MM-DD` strings; the past check is a
/// plain string comparison, valid because the format is fixed-width and
/// zero-padded. An invalid year/month yields an empty grid.
pub fn build_month_grid(
    year: i32,
    month: u32,
    today: &str,
    selected: Option<&str>,
    reconciler: &Reconciler,
) -> Vec<CalendarDay> {
    let mut days: Vec<CalendarDay> = Vec::with_capacity(42);

    let first_weekday = match dates::first_weekday_of_month(year, month) {
        Some(weekday) => weekday,
        None => return days,
    };
    let days_in_current = dates::days_in_month(year, month);

    // Padding days from the previous month
    let (prev_year, prev_month) = if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    };
    let days_in_prev = dates::days_in_month(prev_year, prev_month);
    for i in 0..first_weekday {
        let day = days_in_prev - first_weekday + i + 1;
        let position = days.len();
        days.push(make_day(
            prev_year, prev_month, day, false, position, today, selected, reconciler,
        ));
    }

    // Current month days
    for day in 1..=days_in_current {
        let position = days.len();
        days.push(make_day(
            year, month, day, true, position, today, selected, reconciler,
        ));
    }

    // Padding days from the next month to complete the grid
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let remaining = 42 - days.len();
    for day in 1..=remaining as u32 {
        let position = days.len();
        days.push(make_day(
            next_year, next_month, day, false, position, today, selected, reconciler,
        ));
    }

    days
}

#[allow(clippy::too_many_arguments)]
fn make_day(
    year: i32,
    month: u32,
    day: u32,
    in_month: bool,
    position: usize,
    today: &str,
    selected: Option<&str>,
    reconciler: &Reconciler,
) -> CalendarDay {
    let date_string = dates::format_date(year, month, day);
    // Grid position determines the weekday since the grid starts on Sunday.
    let day_of_week = (position % 7) as u32;

    CalendarDay {
        day,
        day_of_week,
        in_month,
        is_past: date_string.as_str() < today,
        is_blocked: reconciler.is_date_blocked(&date_string, day_of_week),
        is_selected: selected == Some(date_string.as_str()),
        is_today: date_string == today,
        date_string,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DaySchedule;

    fn period(start: &str, end: &str) -> BlockedPeriod {
        BlockedPeriod {
            start_date: start.to_string(),
            end_date: end.to_string(),
        }
    }

    fn schedule_with(days: &[(&str, Option<bool>)]) -> WeeklyAvailability {
        days.iter()
            .map(|(name, enabled)| {
                (
                    name.to_string(),
                    DaySchedule {
                        enabled: *enabled,
                        start: "09:00".to_string(),
                        end: "17:00".to_string(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_blocked_set_expands_inclusive_range() {
        let blocked =
            build_blocked_date_set(&[period("2026-02-23T00:00:00Z", "2026-02-25T00:00:00Z")]);

        assert_eq!(blocked.dates.len(), 3);
        assert!(blocked.dates.contains("2026-02-23"));
        assert!(blocked.dates.contains("2026-02-24"));
        assert!(blocked.dates.contains("2026-02-25"));
        assert!(blocked.skipped.is_empty());
    }

    #[test]
    fn test_blocked_set_ignores_time_of_day_and_offset() {
        // Late-evening UTC stamps must not shift the calendar date.
        let blocked =
            build_blocked_date_set(&[period("2026-02-23T23:30:00Z", "2026-02-23T23:59:59Z")]);

        assert_eq!(blocked.dates.len(), 1);
        assert!(blocked.dates.contains("2026-02-23"));
    }

    #[test]
    fn test_blocked_set_single_day_period() {
        let blocked =
            build_blocked_date_set(&[period("2026-03-01T00:00:00Z", "2026-03-01T00:00:00Z")]);
        assert_eq!(blocked.dates.len(), 1);
        assert!(blocked.dates.contains("2026-03-01"));
    }

    #[test]
    fn test_blocked_set_day_count_matches_span() {
        // Spans a month boundary and (in many zones) a DST transition window.
        let blocked =
            build_blocked_date_set(&[period("2026-03-28T12:00:00Z", "2026-04-03T12:00:00Z")]);
        assert_eq!(blocked.dates.len(), 7);
        assert!(blocked.dates.contains("2026-03-28"));
        assert!(blocked.dates.contains("2026-03-31"));
        assert!(blocked.dates.contains("2026-04-01"));
        assert!(blocked.dates.contains("2026-04-03"));
    }

    #[test]
    fn test_blocked_set_skips_malformed_period() {
        let bad = period("not-a-date", "2026-02-25T00:00:00Z");
        let good = period("2026-02-23T00:00:00Z", "2026-02-23T00:00:00Z");
        let blocked = build_blocked_date_set(&[bad.clone(), good]);

        assert_eq!(blocked.dates.len(), 1);
        assert_eq!(blocked.skipped, vec![bad]);
    }

    #[test]
    fn test_blocked_set_skips_inverted_period() {
        let inverted = period("2026-02-25T00:00:00Z", "2026-02-23T00:00:00Z");
        let blocked = build_blocked_date_set(&[inverted.clone()]);

        assert!(blocked.dates.is_empty());
        assert_eq!(blocked.skipped, vec![inverted]);
    }

    #[test]
    fn test_blocked_set_is_deterministic() {
        let periods = vec![
            period("2026-02-23T00:00:00Z", "2026-02-25T00:00:00Z"),
            period("2026-03-10T08:00:00Z", "2026-03-12T08:00:00Z"),
        ];
        assert_eq!(
            build_blocked_date_set(&periods),
            build_blocked_date_set(&periods)
        );
    }

    #[test]
    fn test_blocked_set_round_trips_formatted_dates() {
        // A date produced by the local formatter, fed back through the
        // builder, reproduces the same calendar date with no off-by-one.
        let date_string = dates::format_date(2026, 2, 23);
        let blocked = build_blocked_date_set(&[period(&date_string, &date_string)]);
        assert!(blocked.dates.contains(date_string.as_str()));
        assert_eq!(blocked.dates.len(), 1);
    }

    #[test]
    fn test_empty_weekly_map_means_no_restriction() {
        assert_eq!(build_enabled_weekday_set(&WeeklyAvailability::new()), None);
    }

    #[test]
    fn test_weekday_set_presence_means_enabled() {
        let weekdays =
            build_enabled_weekday_set(&schedule_with(&[("monday", None), ("tuesday", Some(true))]))
                .unwrap();
        assert!(weekdays.contains(&1));
        assert!(weekdays.contains(&2));
        assert_eq!(weekdays.len(), 2);
    }

    #[test]
    fn test_weekday_set_explicit_false_disables() {
        let weekdays =
            build_enabled_weekday_set(&schedule_with(&[("monday", Some(false)), ("friday", None)]))
                .unwrap();
        assert!(!weekdays.contains(&1));
        assert!(weekdays.contains(&5));
    }

    #[test]
    fn test_weekday_set_ignores_unknown_day_names() {
        let weekdays = build_enabled_weekday_set(&schedule_with(&[("funday", None)])).unwrap();
        assert!(weekdays.is_empty());
    }

    #[test]
    fn test_reconciler_empty_weekly_map_depends_only_on_blocked_set() {
        let schedule = LawyerSchedule {
            blocked_periods: vec![period("2026-02-24T00:00:00Z", "2026-02-24T00:00:00Z")],
            weekly_availability: WeeklyAvailability::new(),
        };
        let reconciler = Reconciler::new(&schedule);

        assert!(reconciler.is_date_blocked("2026-02-24", 2));
        for weekday in 0..7 {
            assert!(!reconciler.is_date_blocked("2026-02-23", weekday));
        }
    }

    #[test]
    fn test_reconciler_monday_only_schedule_blocks_other_days() {
        let schedule = LawyerSchedule {
            blocked_periods: Vec::new(),
            weekly_availability: schedule_with(&[("monday", Some(true))]),
        };
        let reconciler = Reconciler::new(&schedule);

        // 2026-02-23 is a Monday; the rest of that week is disabled.
        assert!(!reconciler.is_date_blocked("2026-02-23", 1));
        for weekday in [0, 2, 3, 4, 5, 6] {
            assert!(reconciler.is_date_blocked("2026-02-24", weekday));
        }
    }

    #[test]
    fn test_reconciler_blocked_date_trumps_enabled_weekday() {
        let schedule = LawyerSchedule {
            blocked_periods: vec![period("2026-02-23T00:00:00Z", "2026-02-23T00:00:00Z")],
            weekly_availability: schedule_with(&[("monday", Some(true))]),
        };
        let reconciler = Reconciler::new(&schedule);
        assert!(reconciler.is_date_blocked("2026-02-23", 1));
    }

    #[test]
    fn test_month_grid_has_42_cells_and_sunday_alignment() {
        let grid = build_month_grid(2026, 2, "2026-02-10", None, &Reconciler::default());

        assert_eq!(grid.len(), 42);
        // February 2026 starts on a Sunday, so cell 0 is Feb 1.
        assert_eq!(grid[0].date_string, "2026-02-01");
        assert!(grid[0].in_month);
        assert_eq!(grid[0].day_of_week, 0);
        assert_eq!(grid[27].date_string, "2026-02-28");
        // Trailing padding continues into March.
        assert_eq!(grid[28].date_string, "2026-03-01");
        assert!(!grid[28].in_month);
    }

    #[test]
    fn test_month_grid_leading_padding_from_previous_month() {
        // March 2026 starts on a Sunday... use May 2026, which starts Friday.
        let grid = build_month_grid(2026, 5, "2026-05-10", None, &Reconciler::default());
        assert_eq!(grid[0].date_string, "2026-04-26");
        assert!(!grid[0].in_month);
        assert_eq!(grid[5].date_string, "2026-05-01");
        assert!(grid[5].in_month);
        assert_eq!(grid[5].day_of_week, 5);
    }

    #[test]
    fn test_month_grid_today_is_selectable_yesterday_is_not() {
        let grid = build_month_grid(2026, 2, "2026-02-10", None, &Reconciler::default());

        let today = grid.iter().find(|d| d.date_string == "2026-02-10").unwrap();
        assert!(today.is_today);
        assert!(!today.is_past);
        assert!(today.is_selectable());

        let yesterday = grid.iter().find(|d| d.date_string == "2026-02-09").unwrap();
        assert!(yesterday.is_past);
        assert!(!yesterday.is_selectable());
    }

    #[test]
    fn test_month_grid_marks_selection_and_blocked_days() {
        let schedule = LawyerSchedule {
            blocked_periods: vec![period("2026-02-20T00:00:00Z", "2026-02-21T00:00:00Z")],
            weekly_availability: WeeklyAvailability::new(),
        };
        let reconciler = Reconciler::new(&schedule);
        let grid = build_month_grid(2026, 2, "2026-02-10", Some("2026-02-17"), &reconciler);

        let selected = grid.iter().find(|d| d.date_string == "2026-02-17").unwrap();
        assert!(selected.is_selected);
        assert!(selected.is_selectable());

        let blocked = grid.iter().find(|d| d.date_string == "2026-02-20").unwrap();
        assert!(blocked.is_blocked);
        assert!(!blocked.is_selectable());
    }

    #[test]
    fn test_month_grid_invalid_month_is_empty() {
        assert!(build_month_grid(2026, 13, "2026-02-10", None, &Reconciler::default()).is_empty());
    }
}
