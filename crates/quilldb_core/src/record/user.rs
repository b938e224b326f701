//! Credential and session records.

use serde::{Deserialize, Serialize};

/// The fixed principal marker used for locally signed-in sessions.
pub const LOCAL_USER_ID: &str = "local-user";

/// The single stored account record.
///
/// At most one credentials record exists at a time; replacing it discards
/// the previous one. The password is an opaque plaintext string - real
/// credential protection is explicitly out of scope for this store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account username.
    pub username: String,
    /// Account password, compared verbatim.
    pub password: String,
    /// Account email.
    pub email: String,
}

/// A password-free view of the stored account, for the auth facade.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    /// Account username.
    pub username: String,
    /// Account email.
    pub email: String,
}

/// The lightweight identity object for the currently signed-in principal.
///
/// At most one session user is persisted at a time, together with the
/// authenticated flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Principal identifier ([`LOCAL_USER_ID`] for sign-in, a generated id
    /// for sign-up).
    pub id: String,
    /// Account email at session start.
    pub email: String,
    /// Display name (the account username).
    pub display_name: String,
}
