use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use shared::TimeSlot;

use crate::services::api::ApiClient;
use crate::services::date_utils::format_date_for_display;
use crate::services::logging::Logger;

#[derive(Properties, PartialEq)]
pub struct TimeSlotListProps {
    pub api_client: ApiClient,
    pub lawyer_id: String,
    /// Selected date in YYYY-MM-DD format
    pub date: String,
    pub on_slot_select: Callback<String>,
}

/// Bookable time slots for one lawyer on one date, fetched whenever the
/// selection changes. A fetch failure degrades to an empty list.
#[function_component(TimeSlotList)]
pub fn time_slot_list(props: &TimeSlotListProps) -> Html {
    let slots = use_state(Vec::<TimeSlot>::new);
    let loading = use_state(|| true);

    use_effect_with((props.lawyer_id.clone(), props.date.clone()), {
        let api_client = props.api_client.clone();
        let slots = slots.clone();
        let loading = loading.clone();

        move |(lawyer_id, date): &(String, String)| {
            let api_client = api_client.clone();
            let lawyer_id = lawyer_id.clone();
            let date = date.clone();
            let slots = slots.clone();
            let loading = loading.clone();

            loading.set(true);
            spawn_local(async move {
                match api_client.get_availability(&lawyer_id, &date).await {
                    Ok(response) => {
                        slots.set(response.slots);
                    }
                    Err(e) => {
                        Logger::warn_with_component(
                            "time-slots",
                            &format!("slot fetch failed: {}", e),
                        );
                        slots.set(Vec::new());
                    }
                }
                loading.set(false);
            });

            || ()
        }
    });

    html! {
        <div class="time-slot-list">
            <h3>{format!("Available times on {}", format_date_for_display(&props.date))}</h3>

            {if *loading {
                html! { <div class="loading">{"Loading time slots..."}</div> }
            } else if slots.is_empty() {
                html! { <div class="empty-state">{"No time slots for this day."}</div> }
            } else {
                html! {
                    <div class="time-slots">
                        {for slots.iter().map(|slot| {
                            let onclick = {
                                let on_slot_select = props.on_slot_select.clone();
                                let time = slot.time.clone();
                                Callback::from(move |_: MouseEvent| {
                                    on_slot_select.emit(time.clone());
                                })
                            };

                            html! {
                                <button
                                    type="button"
                                    class={classes!(
                                        "time-slot",
                                        (!slot.available).then(|| "taken")
                                    )}
                                    disabled={!slot.available}
                                    {onclick}
                                >
                                    {&slot.time}
                                </button>
                            }
                        })}
                    </div>
                }
            }}
        </div>
    }
}
