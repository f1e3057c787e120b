use crate::Credential;
use async_trait::async_trait;
use chrono::DateTime;
use geosign_core::{Context, Error, ProvideCredential, Result};
use http::{Method, Request, StatusCode};
use log::debug;
use serde::Deserialize;
use serde_json::json;

/// CognitoIdentityCredentialProvider fetches temporary credentials through an
/// Amazon Cognito identity pool.
///
/// This is the usual path for browser and mobile map clients that have no
/// long-lived keys of their own. The pool may be unauthenticated, or login
/// tokens from an identity provider can be attached.
///
/// # Usage
/// ```rust,no_run
/// use geosign_location::CognitoIdentityCredentialProvider;
///
/// let provider = CognitoIdentityCredentialProvider::new()
///     .with_identity_pool_id("us-east-1:12345678-1234-1234-1234-123456789012");
/// ```
#[derive(Debug, Clone)]
pub struct CognitoIdentityCredentialProvider {
    identity_pool_id: Option<String>,
    region: Option<String>,
    identity_id: Option<String>,
    logins: Option<std::collections::HashMap<String, String>>,
}

impl Default for CognitoIdentityCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CognitoIdentityCredentialProvider {
    /// Create a new Cognito identity credential provider.
    pub fn new() -> Self {
        Self {
            identity_pool_id: None,
            region: None,
            identity_id: None,
            logins: None,
        }
    }

    /// Set the Cognito identity pool ID, e.g. `us-east-1:guid`.
    ///
    /// The region defaults to the pool ID's prefix unless overridden with
    /// [`with_region`](Self::with_region).
    pub fn with_identity_pool_id(mut self, pool_id: impl Into<String>) -> Self {
        self.identity_pool_id = Some(pool_id.into());
        self
    }

    /// Override the region the identity pool lives in.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set a specific identity ID (if already known).
    pub fn with_identity_id(mut self, identity_id: impl Into<String>) -> Self {
        self.identity_id = Some(identity_id.into());
        self
    }

    /// Add login tokens from identity providers.
    pub fn with_logins(mut self, logins: std::collections::HashMap<String, String>) -> Self {
        self.logins = Some(logins);
        self
    }

    fn endpoint(&self) -> Result<String> {
        let region = match &self.region {
            Some(region) => region.clone(),
            // Identity pool IDs are "<region>:<guid>".
            None => {
                let pool_id = self.identity_pool_id.as_ref().ok_or_else(|| {
                    Error::config_invalid("identity_pool_id is required".to_string())
                })?;
                let (region, _) = pool_id.split_once(':').ok_or_else(|| {
                    Error::config_invalid(format!("invalid identity pool id: {pool_id}"))
                })?;
                region.to_string()
            }
        };

        Ok(format!("https://cognito-identity.{region}.amazonaws.com/"))
    }

    /// Get or create an identity ID.
    async fn get_identity_id(&self, ctx: &Context) -> Result<String> {
        if let Some(id) = &self.identity_id {
            return Ok(id.clone());
        }

        let pool_id = self
            .identity_pool_id
            .as_ref()
            .ok_or_else(|| Error::config_invalid("identity_pool_id is required".to_string()))?;

        let body = if let Some(logins) = &self.logins {
            json!({
                "IdentityPoolId": pool_id,
                "Logins": logins
            })
        } else {
            json!({
                "IdentityPoolId": pool_id
            })
        };

        let req = Request::builder()
            .method(Method::POST)
            .uri(self.endpoint()?)
            .header("x-amz-target", "AWSCognitoIdentityService.GetId")
            .header("content-type", "application/x-amz-json-1.1")
            .body(bytes::Bytes::from(serde_json::to_vec(&body).map_err(
                |e| Error::unexpected(format!("failed to serialize request body: {e}")),
            )?))?;

        let resp = ctx.http_send(req).await?;

        if resp.status() != StatusCode::OK {
            return Err(Error::unexpected(format!(
                "Cognito GetId returned status: {}",
                resp.status()
            )));
        }

        let result: GetIdResponse = serde_json::from_slice(&resp.into_body())
            .map_err(|e| Error::unexpected(format!("failed to parse GetId response: {e}")))?;

        Ok(result.identity_id)
    }

    /// Exchange an identity ID for temporary credentials.
    async fn get_credentials_for_identity(
        &self,
        ctx: &Context,
        identity_id: &str,
    ) -> Result<Credential> {
        let body = if let Some(logins) = &self.logins {
            json!({
                "IdentityId": identity_id,
                "Logins": logins
            })
        } else {
            json!({
                "IdentityId": identity_id
            })
        };

        let req = Request::builder()
            .method(Method::POST)
            .uri(self.endpoint()?)
            .header(
                "x-amz-target",
                "AWSCognitoIdentityService.GetCredentialsForIdentity",
            )
            .header("content-type", "application/x-amz-json-1.1")
            .body(bytes::Bytes::from(serde_json::to_vec(&body).map_err(
                |e| Error::unexpected(format!("failed to serialize request body: {e}")),
            )?))?;

        let resp = ctx.http_send(req).await?;

        if resp.status() != StatusCode::OK {
            return Err(Error::unexpected(format!(
                "Cognito GetCredentialsForIdentity returned status: {}",
                resp.status()
            )));
        }

        let result: GetCredentialsResponse = serde_json::from_slice(&resp.into_body())
            .map_err(|e| Error::unexpected(format!("failed to parse credentials response: {e}")))?;

        let creds = result.credentials;
        let expires_in = DateTime::from_timestamp(creds.expiration, 0)
            .ok_or_else(|| Error::unexpected("invalid expiration timestamp".to_string()))?;

        Ok(Credential {
            access_key_id: creds.access_key_id,
            secret_access_key: creds.secret_key,
            session_token: Some(creds.session_token),
            expires_in: Some(expires_in),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetIdResponse {
    identity_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetCredentialsResponse {
    credentials: CognitoCredentials,
    #[allow(dead_code)]
    identity_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CognitoCredentials {
    access_key_id: String,
    secret_key: String,
    session_token: String,
    expiration: i64,
}

#[async_trait]
impl ProvideCredential for CognitoIdentityCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        if self.identity_pool_id.is_none() && self.identity_id.is_none() {
            debug!("cognito identity: no identity pool ID configured");
            return Ok(None);
        }

        let identity_id = self.get_identity_id(ctx).await?;
        debug!("cognito identity: using identity ID: {identity_id}");

        let creds = self.get_credentials_for_identity(ctx, &identity_id).await?;

        Ok(Some(creds))
    }
}
