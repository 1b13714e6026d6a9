use std::rc::Rc;

use gloo::timers::future::TimeoutFuture;
use uuid::Uuid;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use shared::chat::{ChatAction, ChatState, PendingSend, SendRoute};
use shared::{ClientEvent, ServerEvent};

use crate::services::api::ApiClient;
use crate::services::config::{MESSAGE_PAGE_LIMIT, TYPING_EXPIRY_MS};
use crate::services::date_utils;
use crate::services::logging::Logger;
use crate::services::session::Session;
use crate::services::socket::ChatSocket;

const COMPONENT: &str = "chat-sync";

/// Reducer shim so `shared::chat::ChatState` plugs into `use_reducer`.
struct ChatStore(ChatState);

impl Reducible for ChatStore {
    type Action = ChatAction;

    fn reduce(self: Rc<Self>, action: ChatAction) -> Rc<Self> {
        Rc::new(ChatStore(self.0.clone().apply(action)))
    }
}

impl PartialEq for ChatStore {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

pub struct UseChatResult {
    pub state: ChatState,
    pub actions: UseChatActions,
}

#[derive(Clone, PartialEq)]
pub struct UseChatActions {
    pub open_case: Callback<String>,
    pub send_message: Callback<String>,
    pub notify_typing: Callback<()>,
}

/// The chat synchronizer: one socket per session, at most one joined room,
/// REST as the cold-start and fallback data path.
#[hook]
pub fn use_chat(api_client: &ApiClient, session: &Session) -> UseChatResult {
    let store = {
        let self_id = session.user_id.clone();
        use_reducer(move || ChatStore(ChatState::for_user(self_id)))
    };
    let socket = use_memo(session.token.clone(), |token| ChatSocket::new(token));
    // The joined room, readable from cleanup closures without dragging the
    // whole reducer state along.
    let active_room = use_mut_ref(|| Option::<String>::None);
    // Mirrors the reducer's typing generation so each expiry timer knows
    // whether a newer typing event superseded it.
    let typing_counter = use_mut_ref(|| 0u64);

    // Connection lifecycle, bound to the session token: connect on mount,
    // close unconditionally on unmount or token change.
    {
        let store = store.clone();
        let socket = socket.clone();
        let api_client = api_client.clone();
        let active_room = active_room.clone();
        let typing_counter = typing_counter.clone();

        use_effect_with(session.token.clone(), move |_| {
            let on_status = {
                let store = store.clone();
                Callback::from(move |status| {
                    store.dispatch(ChatAction::ConnectionChanged(status));
                })
            };

            let on_event = {
                let store = store.clone();
                let typing_counter = typing_counter.clone();
                Callback::from(move |event: ServerEvent| match event {
                    ServerEvent::MessageReceived(message) => {
                        store.dispatch(ChatAction::MessagePushed(message));
                    }
                    ServerEvent::UserTyping { .. } => {
                        let generation = *typing_counter.borrow() + 1;
                        *typing_counter.borrow_mut() = generation;
                        store.dispatch(ChatAction::PeerTyping);

                        // Timeout-based expiry; there is no explicit
                        // stopped-typing event in the protocol.
                        let store = store.clone();
                        spawn_local(async move {
                            TimeoutFuture::new(TYPING_EXPIRY_MS).await;
                            store.dispatch(ChatAction::TypingExpired { generation });
                        });
                    }
                    ServerEvent::MessagesRead { case_id } => {
                        store.dispatch(ChatAction::ReadReceiptPushed { case_id });
                    }
                })
            };

            socket.connect(on_status, on_event);

            // Cold-start conversation list over REST; failure leaves the
            // list empty with no automatic retry.
            {
                let store = store.clone();
                let api_client = api_client.clone();
                spawn_local(async move {
                    match api_client.get_conversations().await {
                        Ok(response) => {
                            store.dispatch(ChatAction::ConversationsLoaded(response.conversations));
                        }
                        Err(e) => {
                            Logger::warn_with_component(
                                COMPONENT,
                                &format!("conversation list load failed: {}", e),
                            );
                        }
                    }
                });
            }

            move || {
                // Leave the room we joined, then tear the channel down. The
                // leave intent is drained before the socket drops.
                if let Some(case_id) = active_room.borrow_mut().take() {
                    let _ = socket.send(ClientEvent::LeaveCase(case_id));
                }
                socket.close();
            }
        });
    }

    let open_case = {
        let store = store.clone();
        let socket = socket.clone();
        let api_client = api_client.clone();
        let active_room = active_room.clone();

        Callback::from(move |case_id: String| {
            let previous = active_room.borrow_mut().replace(case_id.clone());
            if let Some(previous) = previous {
                // Re-entering the same case re-joins without a leave; the
                // server treats the re-join as idempotent.
                if previous != case_id {
                    let _ = socket.send(ClientEvent::LeaveCase(previous));
                }
            }

            // Join, then mark read, in that order.
            let _ = socket.send(ClientEvent::JoinCase(case_id.clone()));
            let _ = socket.send(ClientEvent::MarkRead {
                case_id: case_id.clone(),
            });
            store.dispatch(ChatAction::RoomOpened(case_id.clone()));

            // Lazy message page fetch; the reducer drops the page if the
            // user has already switched rooms again.
            let store = store.clone();
            let api_client = api_client.clone();
            spawn_local(async move {
                match api_client
                    .get_messages(&case_id, 1, MESSAGE_PAGE_LIMIT)
                    .await
                {
                    Ok(response) => {
                        store.dispatch(ChatAction::MessagesLoaded {
                            case_id: case_id.clone(),
                            messages: response.messages,
                        });
                    }
                    Err(e) => {
                        Logger::warn_with_component(
                            COMPONENT,
                            &format!("message page load failed: {}", e),
                        );
                    }
                }
                if let Err(e) = api_client.mark_read(&case_id).await {
                    Logger::debug_with_component(COMPONENT, &format!("mark-read failed: {}", e));
                }
            });
        })
    };

    let send_message = {
        let store = store.clone();
        let socket = socket.clone();
        let api_client = api_client.clone();
        let active_room = active_room.clone();

        Callback::from(move |content: String| {
            let case_id = match active_room.borrow().clone() {
                Some(case_id) => case_id,
                None => return,
            };

            let pending = PendingSend {
                client_id: Uuid::new_v4().to_string(),
                case_id: case_id.clone(),
                content: content.clone(),
                created_at: date_utils::now_iso(),
            };
            store.dispatch(ChatAction::SendQueued(pending.clone()));

            if socket.status().send_route() == SendRoute::Push {
                // Fire-and-forget over the channel; the server echo
                // reconciles the pending entry.
                let sent = socket.send(ClientEvent::SendMessage {
                    case_id: case_id.clone(),
                    content: content.clone(),
                    message_type: "text".to_string(),
                });
                if sent.is_ok() {
                    return;
                }
                // The channel raced shut between the status check and the
                // send; the message takes the REST path instead.
            }

            // REST fallback while the channel is down.
            let store = store.clone();
            let api_client = api_client.clone();
            spawn_local(async move {
                match api_client.send_message(&case_id, content).await {
                    Ok(message) => {
                        store.dispatch(ChatAction::MessagePushed(message));
                    }
                    Err(e) => {
                        Logger::warn_with_component(
                            COMPONENT,
                            &format!("fallback send failed, message dropped: {}", e),
                        );
                        store.dispatch(ChatAction::SendFailed {
                            client_id: pending.client_id,
                        });
                    }
                }
            });
        })
    };

    let notify_typing = {
        let socket = socket.clone();
        let active_room = active_room.clone();

        Callback::from(move |_| {
            if let Some(case_id) = active_room.borrow().clone() {
                let _ = socket.send(ClientEvent::Typing { case_id });
            }
        })
    };

    UseChatResult {
        state: store.0.clone(),
        actions: UseChatActions {
            open_case,
            send_message,
            notify_typing,
        },
    }
}
