use wasm_bindgen_futures::spawn_local;
use web_sys::AbortController;
use yew::prelude::*;

use shared::UserProfile;

use crate::services::api::{ApiClient, FetchError};
use crate::services::logging::Logger;
use crate::services::session::{self, Session};

const COMPONENT: &str = "auth";

#[derive(Clone, PartialEq)]
pub struct AuthState {
    pub session: Option<Session>,
    pub user: Option<UserProfile>,
    pub loading: bool,
}

pub struct UseAuthResult {
    pub state: AuthState,
    pub sign_out: Callback<()>,
}

/// Bootstrap the authenticated identity from the stored session token.
///
/// The `/auth/me` request is bound to an abort controller that fires on
/// unmount, so no state update can race a torn-down component; a genuine
/// failure clears the stored session.
#[hook]
pub fn use_auth() -> UseAuthResult {
    let session = use_state(session::load);
    let user = use_state(|| Option::<UserProfile>::None);
    let loading = use_state(|| true);

    use_effect_with((*session).clone(), {
        let session = session.clone();
        let user = user.clone();
        let loading = loading.clone();

        move |current: &Option<Session>| {
            let controller = AbortController::new().ok();

            match current.clone() {
                None => {
                    loading.set(false);
                }
                Some(active) => {
                    let signal = controller.as_ref().map(|c| c.signal());
                    let api_client = ApiClient::with_token(active.token.clone());
                    let session = session.clone();
                    let user = user.clone();
                    let loading = loading.clone();

                    spawn_local(async move {
                        match api_client.me(signal.as_ref()).await {
                            Ok(profile) => {
                                // Keep the cached identity in sync with the
                                // server's view, e.g. after a name change.
                                if profile.id != active.user_id || profile.name != active.name {
                                    session::store(&Session {
                                        token: active.token.clone(),
                                        user_id: profile.id.clone(),
                                        name: profile.name.clone(),
                                    });
                                }
                                user.set(Some(profile));
                                loading.set(false);
                            }
                            Err(FetchError::Aborted) => {
                                // The component went away; this is not a failure.
                            }
                            Err(FetchError::Failed(e)) => {
                                Logger::warn_with_component(
                                    COMPONENT,
                                    &format!("identity bootstrap failed: {}", e),
                                );
                                session::clear();
                                session.set(None);
                                loading.set(false);
                            }
                        }
                    });
                }
            }

            move || {
                if let Some(controller) = controller {
                    controller.abort();
                }
            }
        }
    });

    let sign_out = {
        let session = session.clone();
        let user = user.clone();
        Callback::from(move |_| {
            session::clear();
            session.set(None);
            user.set(None);
        })
    };

    UseAuthResult {
        state: AuthState {
            session: (*session).clone(),
            user: (*user).clone(),
            loading: *loading,
        },
        sign_out,
    }
}
