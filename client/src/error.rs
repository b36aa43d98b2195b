//! Errors reported by Datadog API clients regardless of transport.

/// No user exists with the requested ID.
#[derive(Debug, thiserror::Error)]
#[error("no user exists with ID '{user_id}'")]
pub struct UserNotFound {
    pub user_id: String,
}

impl UserNotFound {
    /// No user exists with the requested ID.
    pub fn new<S: Into<String>>(user_id: S) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}
