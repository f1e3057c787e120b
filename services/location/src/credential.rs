use geosign_core::time::{now, DateTime};
use geosign_core::SigningCredential;
use std::fmt::{Debug, Formatter};

/// Credential that holds the access key and secret key.
///
/// Immutable value; a refresh produces a new instance rather than mutating in
/// place.
#[derive(Default, Clone)]
pub struct Credential {
    /// Access key id.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Session token, usually present for temporary credentials.
    pub session_token: Option<String>,
    /// Expiration time for this credential.
    pub expires_in: Option<DateTime>,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &redacted(&self.access_key_id))
            .field("secret_access_key", &redacted(&self.secret_access_key))
            .field("session_token", &self.session_token.as_deref().map(redacted))
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Keep enough of a key to tell credentials apart in logs without exposing
/// them. Short values are blanked entirely since the visible ends would make
/// up too much of the secret.
fn redacted(value: &str) -> String {
    match value.len() {
        0 => "EMPTY".to_string(),
        n if n < 12 => "***".to_string(),
        n => format!("{}***{}", &value[..3], &value[n - 3..]),
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        if self.access_key_id.is_empty() || self.secret_access_key.is_empty() {
            return false;
        }
        // Take 120s as buffer to avoid edge cases.
        if let Some(valid) = self
            .expires_in
            .map(|v| v > now() + chrono::TimeDelta::try_minutes(2).expect("in bounds"))
        {
            return valid;
        }

        true
    }

    fn expires_at(&self) -> Option<DateTime> {
        self.expires_in
    }
}
