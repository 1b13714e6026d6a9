//! Session token and minimal identity, persisted in local storage and read
//! synchronously at connection-setup time. Storage is not watched for
//! external mutation; a change from another tab takes effect on next load.

use gloo::storage::{LocalStorage, Storage};
use serde::{Deserialize, Serialize};

const TOKEN_KEY: &str = "lawlink.token";
const IDENTITY_KEY: &str = "lawlink.identity";

/// What the client needs about itself before `/auth/me` resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub name: String,
}

/// Load the stored session, if any. A token without a stored identity is
/// treated as no session.
pub fn load() -> Option<Session> {
    let token: String = LocalStorage::get(TOKEN_KEY).ok()?;
    let (user_id, name): (String, String) = LocalStorage::get(IDENTITY_KEY).ok()?;
    Some(Session {
        token,
        user_id,
        name,
    })
}

pub fn store(session: &Session) {
    let _ = LocalStorage::set(TOKEN_KEY, &session.token);
    let _ = LocalStorage::set(IDENTITY_KEY, (&session.user_id, &session.name));
}

pub fn clear() {
    LocalStorage::delete(TOKEN_KEY);
    LocalStorage::delete(IDENTITY_KEY);
}
