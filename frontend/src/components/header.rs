use yew::prelude::*;

#[derive(Clone, Copy, PartialEq)]
pub enum AppView {
    Booking,
    Messages,
}

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub user_name: String,
    pub current_view: AppView,
    pub on_view_change: Callback<AppView>,
    pub on_sign_out: Callback<()>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let book_click = {
        let on_view_change = props.on_view_change.clone();
        Callback::from(move |_: MouseEvent| on_view_change.emit(AppView::Booking))
    };
    let messages_click = {
        let on_view_change = props.on_view_change.clone();
        Callback::from(move |_: MouseEvent| on_view_change.emit(AppView::Messages))
    };
    let sign_out_click = {
        let on_sign_out = props.on_sign_out.clone();
        Callback::from(move |_: MouseEvent| on_sign_out.emit(()))
    };

    html! {
        <header class="header">
            <div class="container">
                <h1>{"LawLink"}</h1>
                <nav class="header-nav">
                    <button
                        type="button"
                        class={classes!("nav-tab", (props.current_view == AppView::Booking).then(|| "active"))}
                        onclick={book_click}
                    >
                        {"Book"}
                    </button>
                    <button
                        type="button"
                        class={classes!("nav-tab", (props.current_view == AppView::Messages).then(|| "active"))}
                        onclick={messages_click}
                    >
                        {"Messages"}
                    </button>
                </nav>
                <div class="header-right">
                    <span class="user-name">{&props.user_name}</span>
                    <button type="button" class="sign-out" onclick={sign_out_click}>{"Sign out"}</button>
                </div>
            </div>
        </header>
    }
}
