use yew::prelude::*;

mod components;
mod hooks;
mod services;

use components::booking_page::BookingPage;
use components::chat_view::ChatView;
use components::header::{AppView, Header};
use hooks::use_auth::use_auth;
use services::api::ApiClient;

#[function_component(App)]
fn app() -> Html {
    let auth = use_auth();
    let current_view = use_state(|| AppView::Booking);

    let on_view_change = {
        let current_view = current_view.clone();
        Callback::from(move |view: AppView| {
            current_view.set(view);
        })
    };

    if auth.state.loading {
        return html! { <div class="loading full-page">{"Loading..."}</div> };
    }

    let (session, user) = match (auth.state.session.clone(), auth.state.user.clone()) {
        (Some(session), Some(user)) => (session, user),
        _ => {
            return html! {
                <div class="signed-out full-page">
                    <h1>{"LawLink"}</h1>
                    <p>{"Your session has expired. Please sign in again."}</p>
                </div>
            };
        }
    };

    let api_client = ApiClient::with_token(session.token.clone());

    html! {
        <>
            <Header
                user_name={user.name.clone()}
                current_view={*current_view}
                on_view_change={on_view_change}
                on_sign_out={auth.sign_out.clone()}
            />

            <main class="main">
                <div class="container">
                    {match *current_view {
                        AppView::Booking => html! {
                            <BookingPage api_client={api_client.clone()} />
                        },
                        AppView::Messages => html! {
                            <ChatView
                                api_client={api_client.clone()}
                                session={session.clone()}
                            />
                        },
                    }}
                </div>
            </main>
        </>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
