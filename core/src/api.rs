use crate::time::DateTime;
use crate::{Context, Result};
use std::fmt::Debug;

/// SigningCredential is the trait implemented by credential values that can
/// back a signature.
pub trait SigningCredential: Clone + Debug + Send + Sync + 'static {
    /// Check if the credential is still usable for signing.
    fn is_valid(&self) -> bool;

    /// The instant this credential stops being usable, if it carries one.
    ///
    /// Refresh scheduling uses this to fetch a replacement ahead of expiry.
    fn expires_at(&self) -> Option<DateTime> {
        None
    }
}

/// ProvideCredential is the trait used to fetch a credential from wherever it
/// lives.
///
/// Services may require different credentials, for example, an access key and
/// secret key pair, or a token exchanged through identity federation.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + 'static {
    /// Credential returned by this provider.
    type Credential: Send + Sync + 'static;

    /// Fetch a credential from the current environment.
    ///
    /// Returns `Ok(None)` if this provider has nothing to offer; callers
    /// decide whether that is an error.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}
