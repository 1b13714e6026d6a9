use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use shared::Lawyer;

use super::booking_calendar::BookingCalendar;
use super::time_slot_list::TimeSlotList;
use crate::hooks::use_availability::use_availability;
use crate::services::api::ApiClient;
use crate::services::logging::Logger;

#[derive(Properties, PartialEq)]
pub struct BookingPageProps {
    pub api_client: ApiClient,
}

/// Lawyer directory plus the booking calendar for the chosen lawyer.
#[function_component(BookingPage)]
pub fn booking_page(props: &BookingPageProps) -> Html {
    let lawyers = use_state(Vec::<Lawyer>::new);
    let selected_lawyer = use_state(|| Option::<String>::None);
    let selected_date = use_state(|| Option::<String>::None);
    let selected_time = use_state(|| Option::<String>::None);

    use_effect_with((), {
        let api_client = props.api_client.clone();
        let lawyers = lawyers.clone();

        move |_| {
            spawn_local(async move {
                match api_client.get_lawyers().await {
                    Ok(response) => {
                        lawyers.set(response.lawyers);
                    }
                    Err(e) => {
                        Logger::warn_with_component(
                            "booking",
                            &format!("lawyer list load failed: {}", e),
                        );
                    }
                }
            });
            || ()
        }
    });

    let on_lawyer_select = {
        let selected_lawyer = selected_lawyer.clone();
        let selected_date = selected_date.clone();
        let selected_time = selected_time.clone();
        Callback::from(move |lawyer_id: String| {
            selected_lawyer.set(Some(lawyer_id));
            selected_date.set(None);
            selected_time.set(None);
        })
    };

    let on_date_select = {
        let selected_date = selected_date.clone();
        let selected_time = selected_time.clone();
        Callback::from(move |date: String| {
            selected_date.set(Some(date));
            selected_time.set(None);
        })
    };

    let on_slot_select = {
        let selected_time = selected_time.clone();
        Callback::from(move |time: String| {
            selected_time.set(Some(time));
        })
    };

    html! {
        <div class="booking-page">
            <section class="lawyer-directory">
                <h2>{"Choose a lawyer"}</h2>
                {if lawyers.is_empty() {
                    html! { <div class="empty-state">{"No lawyers available."}</div> }
                } else {
                    html! {
                        <ul class="lawyer-list">
                            {for lawyers.iter().map(|lawyer| {
                                let is_selected = selected_lawyer.as_deref() == Some(lawyer.id.as_str());
                                let onclick = {
                                    let on_lawyer_select = on_lawyer_select.clone();
                                    let id = lawyer.id.clone();
                                    Callback::from(move |_: MouseEvent| {
                                        on_lawyer_select.emit(id.clone());
                                    })
                                };

                                html! {
                                    <li>
                                        <button
                                            type="button"
                                            class={classes!("lawyer-card", is_selected.then(|| "selected"))}
                                            {onclick}
                                        >
                                            <span class="lawyer-name">{&lawyer.name}</span>
                                            {if let Some(specialty) = &lawyer.specialty {
                                                html! { <span class="lawyer-specialty">{specialty}</span> }
                                            } else { html! {} }}
                                        </button>
                                    </li>
                                }
                            })}
                        </ul>
                    }
                }}
            </section>

            {if let Some(lawyer_id) = (*selected_lawyer).clone() {
                html! {
                    <LawyerBookingPanel
                        api_client={props.api_client.clone()}
                        lawyer_id={lawyer_id}
                        selected_date={(*selected_date).clone()}
                        selected_time={(*selected_time).clone()}
                        on_date_select={on_date_select}
                        on_slot_select={on_slot_select}
                    />
                }
            } else {
                html! { <div class="empty-state">{"Select a lawyer to see their availability."}</div> }
            }}
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct LawyerBookingPanelProps {
    api_client: ApiClient,
    lawyer_id: String,
    selected_date: Option<String>,
    selected_time: Option<String>,
    on_date_select: Callback<String>,
    on_slot_select: Callback<String>,
}

#[function_component(LawyerBookingPanel)]
fn lawyer_booking_panel(props: &LawyerBookingPanelProps) -> Html {
    let availability = use_availability(&props.api_client, &props.lawyer_id);

    html! {
        <section class="booking-panel">
            <h2>{"Pick a day"}</h2>
            <BookingCalendar
                reconciler={availability.reconciler.clone()}
                selected_date={props.selected_date.clone()}
                on_date_select={props.on_date_select.clone()}
                disabled={availability.loading}
            />

            {if let Some(date) = &props.selected_date {
                html! {
                    <TimeSlotList
                        api_client={props.api_client.clone()}
                        lawyer_id={props.lawyer_id.clone()}
                        date={date.clone()}
                        on_slot_select={props.on_slot_select.clone()}
                    />
                }
            } else { html! {} }}

            {if let (Some(date), Some(time)) = (&props.selected_date, &props.selected_time) {
                html! {
                    <div class="booking-summary">
                        {format!("Selected: {} at {}", date, time)}
                    </div>
                }
            } else { html! {} }}
        </section>
    }
}
