use std::rc::Rc;

use yew::prelude::*;

use shared::availability::{build_month_grid, Reconciler};
use shared::dates::month_name;

use crate::services::date_utils::{current_month_year, today_string};

#[derive(Properties, PartialEq)]
pub struct BookingCalendarProps {
    /// Per-day bookability predicate derived from the lawyer's schedule
    pub reconciler: Rc<Reconciler>,
    /// Selected date in YYYY-MM-DD format
    pub selected_date: Option<String>,
    /// Callback when a selectable day is clicked
    pub on_date_select: Callback<String>,
    /// Whether the calendar is disabled (e.g. while the schedule loads)
    pub disabled: bool,
}

/// Month-grid date picker gating appointment booking: blocked and past days
/// render disabled, everything else is clickable.
#[function_component(BookingCalendar)]
pub fn booking_calendar(props: &BookingCalendarProps) -> Html {
    let (initial_month, initial_year) = current_month_year();
    let calendar_month = use_state(move || initial_month);
    let calendar_year = use_state(move || initial_year);

    let prev_month = {
        let calendar_month = calendar_month.clone();
        let calendar_year = calendar_year.clone();
        Callback::from(move |_: MouseEvent| {
            if *calendar_month == 1 {
                calendar_month.set(12);
                calendar_year.set(*calendar_year - 1);
            } else {
                calendar_month.set(*calendar_month - 1);
            }
        })
    };

    let next_month = {
        let calendar_month = calendar_month.clone();
        let calendar_year = calendar_year.clone();
        Callback::from(move |_: MouseEvent| {
            if *calendar_month == 12 {
                calendar_month.set(1);
                calendar_year.set(*calendar_year + 1);
            } else {
                calendar_month.set(*calendar_month + 1);
            }
        })
    };

    // The grid is recomputed per render from the current month, today, the
    // selection, and the reconciler; the expensive derivations live inside
    // the reconciler itself.
    let today = today_string();
    let calendar_days = build_month_grid(
        *calendar_year,
        *calendar_month,
        &today,
        props.selected_date.as_deref(),
        &props.reconciler,
    );

    html! {
        <div class="booking-calendar">
            <div class="calendar-header">
                <button type="button" class="nav-button" onclick={prev_month}>{"‹"}</button>
                <span class="month-year">
                    {format!("{} {}", month_name(*calendar_month), *calendar_year)}
                </span>
                <button type="button" class="nav-button" onclick={next_month}>{"›"}</button>
            </div>

            <div class="calendar-grid">
                <div class="weekday-header">
                    <span>{"Sun"}</span>
                    <span>{"Mon"}</span>
                    <span>{"Tue"}</span>
                    <span>{"Wed"}</span>
                    <span>{"Thu"}</span>
                    <span>{"Fri"}</span>
                    <span>{"Sat"}</span>
                </div>

                <div class="calendar-days">
                    {for calendar_days.iter().map(|day| {
                        let selectable = day.is_selectable() && !props.disabled;
                        let onclick = {
                            let on_date_select = props.on_date_select.clone();
                            let date_string = day.date_string.clone();
                            Callback::from(move |_: MouseEvent| {
                                on_date_select.emit(date_string.clone());
                            })
                        };

                        html! {
                            <button
                                type="button"
                                class={classes!(
                                    "calendar-day",
                                    day.in_month.then(|| "current-month"),
                                    (!day.in_month).then(|| "other-month"),
                                    day.is_blocked.then(|| "blocked"),
                                    day.is_past.then(|| "past"),
                                    day.is_selected.then(|| "selected"),
                                    day.is_today.then(|| "today")
                                )}
                                disabled={!selectable}
                                {onclick}
                            >
                                {day.day}
                            </button>
                        }
                    })}
                </div>
            </div>
        </div>
    }
}
