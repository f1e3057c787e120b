use crate::Credential;
use async_trait::async_trait;
use geosign_core::time::DateTime;
use geosign_core::{Context, ProvideCredential, Result};

/// StaticCredentialProvider hands out one fixed credential.
///
/// Used when keys arrive out of band, and in tests. An expiry can be attached
/// so the refresher schedules the fixed credential like a rotating one.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl StaticCredentialProvider {
    /// Create a provider around an access key ID and secret access key.
    pub fn new(access_key_id: &str, secret_access_key: &str) -> Self {
        Self {
            credential: Credential {
                access_key_id: access_key_id.to_string(),
                secret_access_key: secret_access_key.to_string(),
                session_token: None,
                expires_in: None,
            },
        }
    }

    /// Attach a session token.
    pub fn with_session_token(mut self, token: &str) -> Self {
        self.credential.session_token = Some(token.to_string());
        self
    }

    /// Attach an expiry, after which the credential stops validating.
    pub fn with_expires_in(mut self, expires_in: DateTime) -> Self {
        self.credential.expires_in = Some(expires_in);
        self
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(self.credential.clone()))
    }
}
