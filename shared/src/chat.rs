//! Chat synchronizer state: a pure reducer over the per-session chat view.
//!
//! The browser side (socket pump, REST calls, timers) lives in the frontend;
//! everything that decides *what the state becomes* when an event arrives is
//! here, so the synchronization rules are testable without a DOM. The state
//! tracks the conversation list, the single active room's messages, optimistic
//! pending sends keyed by a client-generated id, and the transient typing
//! flag.

use serde::{Deserialize, Serialize};

use crate::{Conversation, Message};

/// Lifecycle of the push channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
}

impl ConnectionStatus {
    pub fn is_connected(self) -> bool {
        self == ConnectionStatus::Connected
    }

    /// A connected client sends over the push channel and never POSTs; in
    /// every other state the send goes over REST.
    pub fn send_route(self) -> SendRoute {
        if self.is_connected() {
            SendRoute::Push
        } else {
            SendRoute::Rest
        }
    }
}

/// Transport choice for one message send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRoute {
    /// Fire-and-forget over the push channel; the server echo confirms.
    Push,
    /// REST fallback while the channel is down.
    Rest,
}

/// Bounded-retry bookkeeping for the push channel, kept pure so the policy is
/// testable without a socket. The connection manager reports outcomes and
/// asks whether another try is allowed.
///
/// Only a completed handshake refills the attempt budget; merely starting a
/// connection does not, so an unreachable server exhausts the budget instead
/// of retrying forever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectPolicy {
    max_attempts: u32,
    attempt: u32,
}

impl ReconnectPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            attempt: 0,
        }
    }

    /// Status to report while the next try is in flight: `Connecting` for a
    /// fresh channel, `Reconnecting` after any failure.
    pub fn connecting_status(&self) -> ConnectionStatus {
        if self.attempt == 0 {
            ConnectionStatus::Connecting
        } else {
            ConnectionStatus::Reconnecting
        }
    }

    /// The handshake completed; the attempt budget refills.
    pub fn connected(&mut self) {
        self.attempt = 0;
    }

    /// A try failed, or an established connection dropped. Returns whether
    /// another try is allowed.
    pub fn failed(&mut self) -> bool {
        self.attempt += 1;
        self.attempt <= self.max_attempts
    }
}

/// An optimistic send awaiting its authoritative server echo (or REST
/// response). `client_id` never goes over the wire; it only keys the entry
/// locally so a failure can drop exactly this send.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSend {
    pub client_id: String,
    pub case_id: String,
    pub content: String,
    pub created_at: String,
}

/// The whole client-side chat view for one authenticated session.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatState {
    /// Our own user id, used to recognize server echoes of our sends.
    pub self_id: String,
    pub connection: ConnectionStatus,
    pub conversations: Vec<Conversation>,
    /// At most one room is joined at a time.
    pub active_case: Option<String>,
    /// Messages of the active room only; background rooms are fetched lazily
    /// when opened.
    pub messages: Vec<Message>,
    pub pending: Vec<PendingSend>,
    pub peer_typing: bool,
    /// Bumped on every typing event so a stale expiry timer cannot clear a
    /// newer indication.
    pub typing_generation: u64,
}

impl ChatState {
    pub fn for_user(self_id: String) -> Self {
        Self {
            self_id,
            connection: ConnectionStatus::Disconnected,
            conversations: Vec::new(),
            active_case: None,
            messages: Vec::new(),
            pending: Vec::new(),
            peer_typing: false,
            typing_generation: 0,
        }
    }

    fn is_active(&self, case_id: &str) -> bool {
        self.active_case.as_deref() == Some(case_id)
    }
}

/// Everything that can change the chat state, from either the push channel,
/// a REST completion, or the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatAction {
    ConnectionChanged(ConnectionStatus),
    ConversationsLoaded(Vec<Conversation>),
    RoomOpened(String),
    RoomClosed,
    MessagesLoaded {
        case_id: String,
        messages: Vec<Message>,
    },
    MessagePushed(Message),
    SendQueued(PendingSend),
    SendFailed {
        client_id: String,
    },
    PeerTyping,
    TypingExpired {
        generation: u64,
    },
    ReadReceiptPushed {
        case_id: String,
    },
}

impl ChatState {
    pub fn apply(mut self, action: ChatAction) -> Self {
        match action {
            ChatAction::ConnectionChanged(status) => {
                self.connection = status;
            }
            ChatAction::ConversationsLoaded(conversations) => {
                self.conversations = conversations;
            }
            ChatAction::RoomOpened(case_id) => {
                self.messages.clear();
                self.pending.clear();
                self.peer_typing = false;
                if let Some(conversation) = self
                    .conversations
                    .iter_mut()
                    .find(|c| c.case_id == case_id)
                {
                    conversation.unread_count = 0;
                }
                self.active_case = Some(case_id);
            }
            ChatAction::RoomClosed => {
                self.active_case = None;
                self.messages.clear();
                self.pending.clear();
                self.peer_typing = false;
            }
            ChatAction::MessagesLoaded { case_id, messages } => {
                // A page fetched for a room we already left is stale.
                if self.is_active(&case_id) {
                    self.merge_loaded_page(messages);
                }
            }
            ChatAction::MessagePushed(message) => {
                self.message_pushed(message);
            }
            ChatAction::SendQueued(pending) => {
                self.pending.push(pending);
            }
            ChatAction::SendFailed { client_id } => {
                self.pending.retain(|p| p.client_id != client_id);
            }
            ChatAction::PeerTyping => {
                self.peer_typing = true;
                self.typing_generation += 1;
            }
            ChatAction::TypingExpired { generation } => {
                // A newer typing event supersedes this timer.
                if self.typing_generation == generation {
                    self.peer_typing = false;
                }
            }
            ChatAction::ReadReceiptPushed { case_id } => {
                if self.is_active(&case_id) {
                    // Coarse bulk update: everything currently loaded is read.
                    for message in &mut self.messages {
                        message.read = true;
                    }
                }
            }
        }
        self
    }

    /// A REST page becomes the base of the list; messages pushed while the
    /// fetch was in flight are kept, deduplicated by server message id.
    fn merge_loaded_page(&mut self, page: Vec<Message>) {
        let pushed_meanwhile: Vec<Message> = self
            .messages
            .drain(..)
            .filter(|existing| !page.iter().any(|m| m.id == existing.id))
            .collect();
        self.messages = page;
        self.messages.extend(pushed_meanwhile);
    }

    fn message_pushed(&mut self, message: Message) {
        let active = self.is_active(&message.case_id);

        // The conversation preview updates no matter which room is open.
        if let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|c| c.case_id == message.case_id)
        {
            conversation.last_message = Some(message.content.clone());
            conversation.last_message_at = Some(message.created_at.clone());
            if !active {
                conversation.unread_count += 1;
            }
        }

        if !active {
            return;
        }

        // Reconcile the optimistic entry this echo confirms, oldest first.
        if message.sender_id == self.self_id {
            if let Some(position) = self
                .pending
                .iter()
                .position(|p| p.case_id == message.case_id && p.content == message.content)
            {
                self.pending.remove(position);
            }
        }

        // The server id is the dedup key between REST pages and pushes.
        if self.messages.iter().any(|m| m.id == message.id) {
            return;
        }
        self.messages.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: &str, case_id: &str, sender_id: &str, content: &str) -> Message {
        Message {
            id: id.to_string(),
            case_id: case_id.to_string(),
            sender_id: sender_id.to_string(),
            content: content.to_string(),
            created_at: "2026-02-23T10:00:00Z".to_string(),
            read: false,
        }
    }

    fn conversation(case_id: &str) -> Conversation {
        Conversation {
            case_id: case_id.to_string(),
            other_party: "Avery Stone".to_string(),
            last_message: None,
            last_message_at: None,
            unread_count: 0,
        }
    }

    fn state_with_open_room() -> ChatState {
        ChatState::for_user("me".to_string())
            .apply(ChatAction::ConversationsLoaded(vec![
                conversation("case-1"),
                conversation("case-2"),
            ]))
            .apply(ChatAction::RoomOpened("case-1".to_string()))
    }

    #[test]
    fn test_push_for_active_room_appends_and_updates_preview() {
        let state = state_with_open_room()
            .apply(ChatAction::MessagePushed(message("m1", "case-1", "other", "hello")));

        assert_eq!(state.messages.len(), 1);
        let preview = &state.conversations[0];
        assert_eq!(preview.last_message.as_deref(), Some("hello"));
        assert_eq!(preview.unread_count, 0);
    }

    #[test]
    fn test_push_for_background_room_updates_preview_only() {
        let state = state_with_open_room()
            .apply(ChatAction::MessagePushed(message("m1", "case-2", "other", "psst")));

        assert!(state.messages.is_empty());
        let preview = &state.conversations[1];
        assert_eq!(preview.last_message.as_deref(), Some("psst"));
        assert_eq!(preview.unread_count, 1);
    }

    #[test]
    fn test_push_is_deduplicated_by_message_id() {
        let state = state_with_open_room()
            .apply(ChatAction::MessagePushed(message("m1", "case-1", "other", "hello")))
            .apply(ChatAction::MessagePushed(message("m1", "case-1", "other", "hello")));

        assert_eq!(state.messages.len(), 1);
    }

    #[test]
    fn test_own_echo_reconciles_oldest_matching_pending() {
        let pending = |client_id: &str| PendingSend {
            client_id: client_id.to_string(),
            case_id: "case-1".to_string(),
            content: "on my way".to_string(),
            created_at: "2026-02-23T10:00:00Z".to_string(),
        };
        let state = state_with_open_room()
            .apply(ChatAction::SendQueued(pending("tmp-1")))
            .apply(ChatAction::SendQueued(pending("tmp-2")))
            .apply(ChatAction::MessagePushed(message("m1", "case-1", "me", "on my way")));

        assert_eq!(state.pending.len(), 1);
        assert_eq!(state.pending[0].client_id, "tmp-2");
        assert_eq!(state.messages.len(), 1);
    }

    #[test]
    fn test_foreign_message_leaves_pending_alone() {
        let state = state_with_open_room()
            .apply(ChatAction::SendQueued(PendingSend {
                client_id: "tmp-1".to_string(),
                case_id: "case-1".to_string(),
                content: "hi".to_string(),
                created_at: "2026-02-23T10:00:00Z".to_string(),
            }))
            .apply(ChatAction::MessagePushed(message("m1", "case-1", "other", "hi")));

        assert_eq!(state.pending.len(), 1);
    }

    #[test]
    fn test_send_failed_drops_exactly_that_pending() {
        let pending = |client_id: &str| PendingSend {
            client_id: client_id.to_string(),
            case_id: "case-1".to_string(),
            content: "hello".to_string(),
            created_at: "2026-02-23T10:00:00Z".to_string(),
        };
        let state = state_with_open_room()
            .apply(ChatAction::SendQueued(pending("tmp-1")))
            .apply(ChatAction::SendQueued(pending("tmp-2")))
            .apply(ChatAction::SendFailed {
                client_id: "tmp-1".to_string(),
            });

        assert_eq!(state.pending.len(), 1);
        assert_eq!(state.pending[0].client_id, "tmp-2");
    }

    #[test]
    fn test_room_open_clears_state_and_unread_count() {
        let state = state_with_open_room()
            .apply(ChatAction::MessagePushed(message("m1", "case-2", "other", "psst")))
            .apply(ChatAction::RoomOpened("case-2".to_string()));

        assert_eq!(state.active_case.as_deref(), Some("case-2"));
        assert!(state.messages.is_empty());
        assert!(state.pending.is_empty());
        assert_eq!(state.conversations[1].unread_count, 0);
    }

    #[test]
    fn test_stale_page_for_previous_room_is_ignored() {
        let state = state_with_open_room()
            .apply(ChatAction::RoomOpened("case-2".to_string()))
            .apply(ChatAction::MessagesLoaded {
                case_id: "case-1".to_string(),
                messages: vec![message("m1", "case-1", "other", "old news")],
            });

        assert!(state.messages.is_empty());
    }

    #[test]
    fn test_loaded_page_keeps_messages_pushed_during_fetch() {
        let state = state_with_open_room()
            // Push races ahead of the page fetch...
            .apply(ChatAction::MessagePushed(message("m3", "case-1", "other", "latest")))
            .apply(ChatAction::MessagesLoaded {
                case_id: "case-1".to_string(),
                messages: vec![
                    message("m1", "case-1", "other", "first"),
                    message("m2", "case-1", "me", "second"),
                ],
            });

        let ids: Vec<&str> = state.messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2", "m3"]);
    }

    #[test]
    fn test_loaded_page_deduplicates_already_pushed_message() {
        let state = state_with_open_room()
            .apply(ChatAction::MessagePushed(message("m2", "case-1", "other", "second")))
            .apply(ChatAction::MessagesLoaded {
                case_id: "case-1".to_string(),
                messages: vec![
                    message("m1", "case-1", "other", "first"),
                    message("m2", "case-1", "other", "second"),
                ],
            });

        assert_eq!(state.messages.len(), 2);
    }

    #[test]
    fn test_read_receipt_marks_all_loaded_messages() {
        let state = state_with_open_room()
            .apply(ChatAction::MessagePushed(message("m1", "case-1", "me", "a")))
            .apply(ChatAction::MessagePushed(message("m2", "case-1", "me", "b")))
            .apply(ChatAction::ReadReceiptPushed {
                case_id: "case-1".to_string(),
            });

        assert!(state.messages.iter().all(|m| m.read));
    }

    #[test]
    fn test_read_receipt_for_other_room_is_ignored() {
        let state = state_with_open_room()
            .apply(ChatAction::MessagePushed(message("m1", "case-1", "me", "a")))
            .apply(ChatAction::ReadReceiptPushed {
                case_id: "case-2".to_string(),
            });

        assert!(!state.messages[0].read);
    }

    #[test]
    fn test_typing_expiry_respects_generation() {
        let state = ChatState::for_user("me".to_string()).apply(ChatAction::PeerTyping);
        assert!(state.peer_typing);
        let generation = state.typing_generation;

        // A second typing event before the first timer fires resets the clock.
        let state = state.apply(ChatAction::PeerTyping);
        let state = state.apply(ChatAction::TypingExpired { generation });
        assert!(state.peer_typing);

        let generation = state.typing_generation;
        let state = state.apply(ChatAction::TypingExpired { generation });
        assert!(!state.peer_typing);
    }

    #[test]
    fn test_send_route_posts_iff_not_connected() {
        assert_eq!(ConnectionStatus::Connected.send_route(), SendRoute::Push);
        for status in [
            ConnectionStatus::Disconnected,
            ConnectionStatus::Connecting,
            ConnectionStatus::Reconnecting,
        ] {
            assert_eq!(status.send_route(), SendRoute::Rest);
        }
    }

    #[test]
    fn test_reconnect_policy_bounds_consecutive_failures() {
        let mut policy = ReconnectPolicy::new(3);
        assert_eq!(policy.connecting_status(), ConnectionStatus::Connecting);

        assert!(policy.failed());
        assert_eq!(policy.connecting_status(), ConnectionStatus::Reconnecting);
        assert!(policy.failed());
        assert!(policy.failed());
        // The budget is spent; the fourth consecutive failure ends the loop.
        assert!(!policy.failed());
    }

    #[test]
    fn test_reconnect_policy_refills_only_on_completed_handshake() {
        let mut policy = ReconnectPolicy::new(2);
        assert!(policy.failed());
        assert!(policy.failed());

        // An opened connection refills the budget; starting (and losing) a
        // handshake never does.
        policy.connected();
        assert_eq!(policy.connecting_status(), ConnectionStatus::Connecting);
        assert!(policy.failed());
        assert!(policy.failed());
        assert!(!policy.failed());
    }

    #[test]
    fn test_connection_status_transitions() {
        let state = ChatState::for_user("me".to_string());
        assert_eq!(state.connection, ConnectionStatus::Disconnected);

        let state = state
            .apply(ChatAction::ConnectionChanged(ConnectionStatus::Connecting))
            .apply(ChatAction::ConnectionChanged(ConnectionStatus::Connected));
        assert!(state.connection.is_connected());

        let state = state.apply(ChatAction::ConnectionChanged(ConnectionStatus::Reconnecting));
        assert!(!state.connection.is_connected());
    }
}
