pub mod use_auth;
pub mod use_availability;
pub mod use_chat;
