use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod availability;
pub mod chat;
pub mod dates;

/// An inclusive date range during which no bookings may be made.
///
/// Endpoints are RFC 3339 UTC instants as delivered by the schedule service,
/// but only the calendar-date component is meaningful; time-of-day and zone
/// offset are discarded when the range is expanded into concrete days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedPeriod {
    pub start_date: String,
    pub end_date: String,
}

/// Recurring open hours for a single weekday.
///
/// A missing `enabled` field means the day is open; only an explicit
/// `enabled: false` closes a configured day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Opening time, "HH:MM"
    pub start: String,
    /// Closing time, "HH:MM"
    pub end: String,
}

/// Weekly recurring schedule keyed by lowercase day name ("sunday".."saturday").
///
/// An empty map means no day-of-week restriction applies at all (every
/// weekday is open). This default-permissive rule is deliberate.
pub type WeeklyAvailability = HashMap<String, DaySchedule>;

/// Full availability signal for one lawyer, as fetched from the schedule service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LawyerSchedule {
    #[serde(default)]
    pub blocked_periods: Vec<BlockedPeriod>,
    #[serde(default)]
    pub weekly_availability: WeeklyAvailability,
}

/// A bookable (or taken) time slot on a specific date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub time: String,
    pub available: bool,
}

/// Response of `GET /lawyers/:id/availability?date=YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub slots: Vec<TimeSlot>,
}

/// A lawyer as listed in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lawyer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub specialty: Option<String>,
}

/// Response of `GET /lawyers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LawyerListResponse {
    pub lawyers: Vec<Lawyer>,
}

/// A chat message, whether REST-fetched, pushed, or the server echo of a send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub case_id: String,
    pub sender_id: String,
    pub content: String,
    /// RFC 3339 timestamp
    pub created_at: String,
    #[serde(default)]
    pub read: bool,
}

/// One entry in the conversation list, previewing the latest traffic per case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub case_id: String,
    pub other_party: String,
    #[serde(default)]
    pub last_message: Option<String>,
    #[serde(default)]
    pub last_message_at: Option<String>,
    #[serde(default)]
    pub unread_count: u32,
}

/// Response of `GET /chat/conversations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationListResponse {
    pub conversations: Vec<Conversation>,
}

/// Response of `GET /chat/:caseId/messages?page&limit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageListResponse {
    pub messages: Vec<Message>,
    #[serde(default)]
    pub has_more: bool,
}

/// Body of `POST /chat/:caseId/messages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

/// Response of `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub role: String,
}

/// Events the client emits over the push channel.
///
/// Wire form is `{"event": "<name>", "data": <payload>}` with camelCase
/// payload fields, matching the server's event table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    JoinCase(String),
    LeaveCase(String),
    #[serde(rename_all = "camelCase")]
    SendMessage {
        case_id: String,
        content: String,
        #[serde(rename = "type")]
        message_type: String,
    },
    #[serde(rename_all = "camelCase")]
    Typing { case_id: String },
    #[serde(rename_all = "camelCase")]
    MarkRead { case_id: String },
}

/// Events the server pushes to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    MessageReceived(Message),
    #[serde(rename_all = "camelCase")]
    UserTyping { user_id: String },
    #[serde(rename_all = "camelCase")]
    MessagesRead { case_id: String },
}
