//! Core components for presigning map service URLs.
//!
//! This crate provides the foundational types and traits for the geosign
//! ecosystem: the credential boundary, the background refresh schedule, and
//! the parsed-URL form that canonicalization works on.
//!
//! ## Overview
//!
//! The crate is built around several key concepts:
//!
//! - **Context**: A container holding implementations for HTTP sending and
//!   environment access, injected into credential providers
//! - **Traits**: Abstract interfaces for credential values
//!   (`SigningCredential`) and credential acquisition (`ProvideCredential`)
//! - **CredentialRefresher**: Keeps the latest credential behind a
//!   synchronous accessor, re-fetching ahead of expiry
//!
//! ## Example
//!
//! ```no_run
//! use geosign_core::{Context, CredentialRefresher, ProvideCredential, SigningCredential};
//! use geosign_core::Result;
//!
//! // Define your credential type
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     key: String,
//!     secret: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.key.is_empty() && !self.secret.is_empty()
//!     }
//! }
//!
//! // Implement a credential provider
//! #[derive(Debug)]
//! struct MyProvider;
//!
//! #[async_trait::async_trait]
//! impl ProvideCredential for MyProvider {
//!     type Credential = MyCredential;
//!
//!     async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
//!         Ok(Some(MyCredential {
//!             key: "my-access-key".to_string(),
//!             secret: "my-secret-key".to_string(),
//!         }))
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::default();
//!
//! // Initial fetch happens here; refreshes run in the background afterwards.
//! let refresher = CredentialRefresher::spawn(ctx, MyProvider).await?;
//! let cred = refresher.current();
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;

mod context;
pub use context::Context;
pub use context::Env;
pub use context::HttpSend;
pub use context::OsEnv;
pub use context::StaticEnv;

mod api;
pub use api::{ProvideCredential, SigningCredential};
mod request;
pub use request::SigningRequest;
mod refresh;
pub use refresh::{CredentialRefresher, RefreshErrorHandler};

mod error;
pub use error::{Error, ErrorKind, Result};
