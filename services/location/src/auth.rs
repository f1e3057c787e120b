use crate::endpoint::{self, ResourceKind};
use crate::presign::UrlSigner;
use crate::Credential;
use geosign_core::{
    Context, CredentialRefresher, ProvideCredential, Result, SigningRequest,
};
use log::debug;

/// MapAuthHelper wires a credential provider, the background refresher and the
/// URL signer into the single hook map renderers call for every resource they
/// fetch.
///
/// Construction performs the initial credential fetch and fails if it fails.
/// After that [`transform_request`](Self::transform_request) is synchronous
/// and cheap: it reads the most recently refreshed credential and signs only
/// URLs that point at a recognized map endpoint, passing everything else
/// through untouched.
#[derive(Debug)]
pub struct MapAuthHelper {
    region: String,
    refresher: CredentialRefresher<Credential>,
}

impl MapAuthHelper {
    /// Create a new MapAuthHelper for the given region.
    ///
    /// Fetches the initial credential through `provider` before returning and
    /// spawns the refresh task that keeps it current.
    pub async fn new(
        ctx: Context,
        provider: impl ProvideCredential<Credential = Credential>,
        region: &str,
    ) -> Result<Self> {
        Ok(Self {
            region: region.to_string(),
            refresher: CredentialRefresher::spawn(ctx, provider).await?,
        })
    }

    /// Like [`new`](Self::new), with a handler that observes credential
    /// refresh failures after retries are exhausted.
    pub async fn with_error_handler(
        ctx: Context,
        provider: impl ProvideCredential<Credential = Credential>,
        region: &str,
        handler: impl Fn(geosign_core::Error) + Send + Sync + 'static,
    ) -> Result<Self> {
        Ok(Self {
            region: region.to_string(),
            refresher: CredentialRefresher::spawn_with_error_handler(ctx, provider, handler)
                .await?,
        })
    }

    /// Sign `url` if it targets a map endpoint that requires signing,
    /// otherwise return it unchanged.
    ///
    /// `kind` is the resource the renderer is about to fetch, when known.
    /// Standalone maps endpoints sign tile requests only; consolidated
    /// endpoints sign everything.
    pub fn transform_request(&self, url: &str, kind: Option<ResourceKind>) -> Result<String> {
        let req = match SigningRequest::from_url(url) {
            Ok(req) => req,
            // Relative or otherwise unparseable URLs are not ours to sign.
            Err(_) => return Ok(url.to_string()),
        };

        let Some(family) = endpoint::resolve(&req) else {
            return Ok(url.to_string());
        };

        if !family.requires_signing(kind) {
            debug!("skipping signing for {kind:?} on {family:?}");
            return Ok(url.to_string());
        }

        let cred = self.refresher.current();
        UrlSigner::new(family.service_name(), &self.region).presign_url(url, &cred)
    }

    /// The most recently refreshed credential.
    pub fn credentials(&self) -> Credential {
        self.refresher.current()
    }
}
