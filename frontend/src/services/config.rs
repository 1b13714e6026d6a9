//! Client-side configuration constants. Connection tuning lives here rather
//! than on the public API of the socket manager.

/// Base URL for the REST API
pub const API_BASE_URL: &str = "http://localhost:3000";

/// Push channel endpoint; the session token is appended as a query parameter
/// at connection time.
pub const WS_URL: &str = "ws://localhost:3000/ws";

/// Bounded reconnection attempts after an unexpected disconnect
pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Fixed delay between reconnection attempts (no backoff growth)
pub const RECONNECT_DELAY_MS: u32 = 3_000;

/// How long a typing indicator stays lit without a fresh typing event
pub const TYPING_EXPIRY_MS: u32 = 2_000;

/// Page size for the lazy message fetch when a conversation is opened
pub const MESSAGE_PAGE_LIMIT: u32 = 50;
