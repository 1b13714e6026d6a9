use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use shared::availability::Reconciler;
use shared::LawyerSchedule;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;

const COMPONENT: &str = "availability";

pub struct UseAvailabilityResult {
    /// O(1) per-day bookability predicate, rebuilt only when the fetched
    /// schedule changes.
    pub reconciler: Rc<Reconciler>,
    pub loading: bool,
}

/// Fetch a lawyer's schedule and derive the calendar reconciler from it.
///
/// A fetch failure leaves the schedule empty, which the reconciler treats as
/// fully open: the calendar fails open toward bookable rather than erroring.
#[hook]
pub fn use_availability(api_client: &ApiClient, lawyer_id: &str) -> UseAvailabilityResult {
    let schedule = use_state(LawyerSchedule::default);
    let loading = use_state(|| true);

    use_effect_with(lawyer_id.to_string(), {
        let api_client = api_client.clone();
        let schedule = schedule.clone();
        let loading = loading.clone();

        move |lawyer_id: &String| {
            let api_client = api_client.clone();
            let lawyer_id = lawyer_id.clone();
            let schedule = schedule.clone();
            let loading = loading.clone();

            loading.set(true);
            spawn_local(async move {
                match api_client.get_lawyer_schedule(&lawyer_id).await {
                    Ok(data) => {
                        schedule.set(data);
                    }
                    Err(e) => {
                        Logger::warn_with_component(
                            COMPONENT,
                            &format!("schedule fetch failed, calendar stays open: {}", e),
                        );
                        schedule.set(LawyerSchedule::default());
                    }
                }
                loading.set(false);
            });

            || ()
        }
    });

    // One pass over the periods and the weekday map per fetched schedule;
    // the 42-cell grid then queries in O(1) per day.
    let reconciler = use_memo((*schedule).clone(), |schedule| {
        let reconciler = Reconciler::new(schedule);
        for period in reconciler.skipped_periods() {
            Logger::warn_with_component(
                COMPONENT,
                &format!(
                    "skipped invalid blocked period {} .. {}",
                    period.start_date, period.end_date
                ),
            );
        }
        reconciler
    });

    UseAvailabilityResult {
        reconciler,
        loading: *loading,
    }
}
