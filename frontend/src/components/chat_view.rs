use web_sys::HtmlInputElement;
use yew::prelude::*;

use shared::chat::ConnectionStatus;

use crate::hooks::use_chat::use_chat;
use crate::services::api::ApiClient;
use crate::services::session::Session;

#[derive(Properties, PartialEq)]
pub struct ChatViewProps {
    pub api_client: ApiClient,
    pub session: Session,
}

/// Per-case messaging view: conversation list on the left, the active room
/// on the right, with live previews for background conversations.
#[function_component(ChatView)]
pub fn chat_view(props: &ChatViewProps) -> Html {
    let chat = use_chat(&props.api_client, &props.session);
    let draft = use_state(String::new);

    let on_conversation_click = {
        let open_case = chat.actions.open_case.clone();
        Callback::from(move |case_id: String| {
            open_case.emit(case_id);
        })
    };

    let on_draft_input = {
        let draft = draft.clone();
        let notify_typing = chat.actions.notify_typing.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            draft.set(input.value());
            notify_typing.emit(());
        })
    };

    let on_submit = {
        let draft = draft.clone();
        let send_message = chat.actions.send_message.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let content = (*draft).trim().to_string();
            if content.is_empty() {
                return;
            }
            send_message.emit(content);
            draft.set(String::new());
        })
    };

    let active_case = chat.state.active_case.clone();
    let other_party = active_case.as_ref().and_then(|case_id| {
        chat.state
            .conversations
            .iter()
            .find(|c| &c.case_id == case_id)
            .map(|c| c.other_party.clone())
    });

    html! {
        <div class="chat-view">
            {if !chat.state.connection.is_connected() {
                let label = match chat.state.connection {
                    ConnectionStatus::Connecting => "Connecting...",
                    _ => "Reconnecting...",
                };
                html! { <div class="reconnecting-banner">{label}</div> }
            } else { html! {} }}

            <aside class="conversation-list">
                <h2>{"Conversations"}</h2>
                {if chat.state.conversations.is_empty() {
                    html! { <div class="empty-state">{"No conversations yet."}</div> }
                } else {
                    html! {
                        <ul>
                            {for chat.state.conversations.iter().map(|conversation| {
                                let is_active = active_case.as_deref() == Some(conversation.case_id.as_str());
                                let onclick = {
                                    let on_conversation_click = on_conversation_click.clone();
                                    let case_id = conversation.case_id.clone();
                                    Callback::from(move |_: MouseEvent| {
                                        on_conversation_click.emit(case_id.clone());
                                    })
                                };

                                html! {
                                    <li>
                                        <button
                                            type="button"
                                            class={classes!("conversation-item", is_active.then(|| "active"))}
                                            {onclick}
                                        >
                                            <span class="conversation-party">{&conversation.other_party}</span>
                                            {if let Some(preview) = &conversation.last_message {
                                                html! { <span class="conversation-preview">{preview}</span> }
                                            } else { html! {} }}
                                            {if conversation.unread_count > 0 {
                                                html! { <span class="unread-badge">{conversation.unread_count}</span> }
                                            } else { html! {} }}
                                        </button>
                                    </li>
                                }
                            })}
                        </ul>
                    }
                }}
            </aside>

            <section class="message-panel">
                {if active_case.is_none() {
                    html! { <div class="empty-state">{"Open a conversation to start messaging."}</div> }
                } else {
                    html! {
                        <>
                            <header class="message-panel-header">
                                <h2>{other_party.unwrap_or_else(|| "Conversation".to_string())}</h2>
                            </header>

                            <div class="message-list">
                                {for chat.state.messages.iter().map(|message| {
                                    let own = message.sender_id == chat.state.self_id;
                                    html! {
                                        <div class={classes!(
                                            "message",
                                            own.then(|| "own"),
                                            message.read.then(|| "read")
                                        )}>
                                            <span class="message-content">{&message.content}</span>
                                        </div>
                                    }
                                })}

                                {for chat.state.pending.iter().map(|pending| {
                                    html! {
                                        <div class="message own sending">
                                            <span class="message-content">{&pending.content}</span>
                                        </div>
                                    }
                                })}

                                {if chat.state.peer_typing {
                                    html! { <div class="typing-indicator">{"typing..."}</div> }
                                } else { html! {} }}
                            </div>

                            <form class="message-compose" onsubmit={on_submit}>
                                <input
                                    type="text"
                                    placeholder="Write a message..."
                                    value={(*draft).clone()}
                                    oninput={on_draft_input}
                                />
                                <button type="submit" class="btn btn-primary">{"Send"}</button>
                            </form>
                        </>
                    }
                }}
            </section>
        </div>
    }
}
