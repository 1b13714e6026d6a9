use gloo::net::http::{Request, RequestBuilder};
use shared::{
    AvailabilityResponse, ConversationListResponse, LawyerListResponse, LawyerSchedule, Message,
    MessageListResponse, SendMessageRequest, UserProfile,
};
use web_sys::AbortSignal;

use crate::services::config::API_BASE_URL;

/// Failure of a cancellable request. Cancellation is not an error condition;
/// callers suppress it instead of logging or surfacing it.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    Aborted,
    Failed(String),
}

impl FetchError {
    fn from_net(error: gloo::net::Error) -> Self {
        match &error {
            gloo::net::Error::JsError(js) if js.name == "AbortError" => FetchError::Aborted,
            _ => FetchError::Failed(format!("Network error: {}", error)),
        }
    }
}

/// API client for communicating with the platform backend
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client with the default base URL
    pub fn new() -> Self {
        Self {
            base_url: API_BASE_URL.to_string(),
            token: None,
        }
    }

    /// Create a new API client carrying a bearer token
    pub fn with_token(token: String) -> Self {
        Self {
            base_url: API_BASE_URL.to_string(),
            token: Some(token),
        }
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    /// Bootstrap the authenticated identity. The caller's abort signal is
    /// honored so an unmounted component never races a state update.
    pub async fn me(&self, signal: Option<&AbortSignal>) -> Result<UserProfile, FetchError> {
        let url = format!("{}/auth/me", self.base_url);
        let request = self.authorized(Request::get(&url)).abort_signal(signal);

        match request.send().await {
            Ok(response) => {
                if response.ok() {
                    response
                        .json::<UserProfile>()
                        .await
                        .map_err(|e| FetchError::Failed(format!("Failed to parse profile: {}", e)))
                } else {
                    Err(FetchError::Failed(format!(
                        "Auth check failed with status {}",
                        response.status()
                    )))
                }
            }
            Err(e) => Err(FetchError::from_net(e)),
        }
    }

    /// List lawyers available for booking
    pub async fn get_lawyers(&self) -> Result<LawyerListResponse, String> {
        let url = format!("{}/lawyers", self.base_url);

        match self.authorized(Request::get(&url)).send().await {
            Ok(response) => match response.json::<LawyerListResponse>().await {
                Ok(data) => Ok(data),
                Err(e) => Err(format!("Failed to parse lawyer list: {}", e)),
            },
            Err(e) => Err(format!("Failed to fetch lawyer list: {}", e)),
        }
    }

    /// Fetch one lawyer's blocked periods and weekly schedule
    pub async fn get_lawyer_schedule(&self, lawyer_id: &str) -> Result<LawyerSchedule, String> {
        let url = format!("{}/lawyers/{}/schedule", self.base_url, lawyer_id);

        match self.authorized(Request::get(&url)).send().await {
            Ok(response) => match response.json::<LawyerSchedule>().await {
                Ok(data) => Ok(data),
                Err(e) => Err(format!("Failed to parse schedule: {}", e)),
            },
            Err(e) => Err(format!("Failed to fetch schedule: {}", e)),
        }
    }

    /// Fetch bookable time slots for one lawyer on one date
    pub async fn get_availability(
        &self,
        lawyer_id: &str,
        date: &str,
    ) -> Result<AvailabilityResponse, String> {
        let url = format!(
            "{}/lawyers/{}/availability?date={}",
            self.base_url, lawyer_id, date
        );

        match self.authorized(Request::get(&url)).send().await {
            Ok(response) => match response.json::<AvailabilityResponse>().await {
                Ok(data) => Ok(data),
                Err(e) => Err(format!("Failed to parse availability: {}", e)),
            },
            Err(e) => Err(format!("Failed to fetch availability: {}", e)),
        }
    }

    /// Fetch the conversation list
    pub async fn get_conversations(&self) -> Result<ConversationListResponse, String> {
        let url = format!("{}/chat/conversations", self.base_url);

        match self.authorized(Request::get(&url)).send().await {
            Ok(response) => match response.json::<ConversationListResponse>().await {
                Ok(data) => Ok(data),
                Err(e) => Err(format!("Failed to parse conversations: {}", e)),
            },
            Err(e) => Err(format!("Failed to fetch conversations: {}", e)),
        }
    }

    /// Fetch a page of messages for a case
    pub async fn get_messages(
        &self,
        case_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<MessageListResponse, String> {
        let url = format!(
            "{}/chat/{}/messages?page={}&limit={}",
            self.base_url, case_id, page, limit
        );

        match self.authorized(Request::get(&url)).send().await {
            Ok(response) => match response.json::<MessageListResponse>().await {
                Ok(data) => Ok(data),
                Err(e) => Err(format!("Failed to parse messages: {}", e)),
            },
            Err(e) => Err(format!("Failed to fetch messages: {}", e)),
        }
    }

    /// Send a message over REST; the fallback path when the push channel is
    /// down. Returns the authoritative stored message.
    pub async fn send_message(&self, case_id: &str, content: String) -> Result<Message, String> {
        let url = format!("{}/chat/{}/messages", self.base_url, case_id);
        let request = SendMessageRequest { content };

        match self
            .authorized(Request::post(&url))
            .json(&request)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
        {
            Ok(response) => {
                if response.ok() {
                    match response.json::<Message>().await {
                        Ok(data) => Ok(data),
                        Err(e) => Err(format!("Failed to parse response: {}", e)),
                    }
                } else {
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    Err(error_text)
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    /// Mark every message in a case read
    pub async fn mark_read(&self, case_id: &str) -> Result<(), String> {
        let url = format!("{}/chat/{}/messages/read", self.base_url, case_id);

        match self.authorized(Request::put(&url)).send().await {
            Ok(response) => {
                if response.ok() {
                    Ok(())
                } else {
                    Err(format!("Mark read failed with status {}", response.status()))
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}
