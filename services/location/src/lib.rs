//! Presigned-URL authentication for map tile and style endpoints.
//!
//! The crate signs outbound map resource URLs with an AWS SigV4 query-string
//! signature and keeps the credential behind it fresh. The usual entry point
//! is [`MapAuthHelper`]:
//!
//! ```rust,no_run
//! use geosign_core::Context;
//! use geosign_http_send_reqwest::ReqwestHttpSend;
//! use geosign_location::{CognitoIdentityCredentialProvider, MapAuthHelper, ResourceKind};
//!
//! # async fn example() -> geosign_core::Result<()> {
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
//! let provider = CognitoIdentityCredentialProvider::new()
//!     .with_identity_pool_id("us-east-1:12345678-1234-1234-1234-123456789012");
//!
//! let helper = MapAuthHelper::new(ctx, provider, "us-east-1").await?;
//! let signed = helper.transform_request(
//!     "https://maps.geo.us-east-1.amazonaws.com/v2/tiles/0/0/0",
//!     Some(ResourceKind::Tile),
//! )?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod auth;
pub use auth::MapAuthHelper;

mod credential;
pub use credential::Credential;

mod endpoint;
pub use endpoint::{resolve, ResourceKind, ServiceFamily};

mod presign;
pub use presign::UrlSigner;

mod provide_credential;
pub use provide_credential::{
    CognitoIdentityCredentialProvider, EnvCredentialProvider, StaticCredentialProvider,
};

mod constants;
