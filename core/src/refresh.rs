use crate::time::now;
use crate::{Context, Error, ProvideCredential, Result, SigningCredential};
use log::{debug, error, warn};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Refresh this long before the credential's stated expiry, to absorb the
/// latency of the refresh itself and clock skew.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Refresh cadence for credentials that carry no expiry.
const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(3600);

/// Floor for the computed delay. A provider handing out credentials that are
/// already within the margin must not turn the schedule into a hot loop.
const MIN_REFRESH_DELAY: Duration = Duration::from_secs(5);

/// How many times a failed background refresh is retried before the failure
/// is reported and the schedule falls back to the default cadence.
const RETRY_BUDGET: u32 = 3;

const RETRY_BACKOFF_BASE: Duration = Duration::from_secs(1);
const RETRY_BACKOFF_CAP: Duration = Duration::from_secs(30);

/// Callback invoked when a background refresh exhausts its retry budget.
pub type RefreshErrorHandler = Arc<dyn Fn(Error) + Send + Sync>;

/// CredentialRefresher keeps a single continuously-fresh credential behind a
/// synchronous accessor.
///
/// Construction performs the initial fetch; an error there fails construction
/// as a whole. Afterwards a background task re-fetches the credential ahead
/// of its expiry (one minute early), or hourly when the credential carries no
/// expiry. Exactly one refresh is in flight at a time; [`current`] always
/// returns the most recently completed fetch without blocking, even while a
/// refresh is running.
///
/// A refresh that fails is retried with exponential backoff. If the budget is
/// exhausted the last-good credential stays in place, the failure is passed
/// to the optional error handler, and the schedule falls back to the default
/// cadence.
///
/// Dropping the refresher aborts the background task; the last-known
/// credential remains readable until the handle itself is dropped.
///
/// [`current`]: CredentialRefresher::current
pub struct CredentialRefresher<K: SigningCredential> {
    cell: Arc<RwLock<K>>,
    task: JoinHandle<()>,
}

impl<K: SigningCredential> std::fmt::Debug for CredentialRefresher<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRefresher")
            .field("current", &*self.cell.read().expect("lock poisoned"))
            .finish()
    }
}

impl<K: SigningCredential> CredentialRefresher<K> {
    /// Fetch the initial credential and start the refresh schedule.
    pub async fn spawn(
        ctx: Context,
        provider: impl ProvideCredential<Credential = K>,
    ) -> Result<Self> {
        Self::spawn_inner(ctx, Arc::new(provider), None).await
    }

    /// Like [`spawn`], with a handler that observes refresh failures once the
    /// retry budget is exhausted.
    ///
    /// [`spawn`]: CredentialRefresher::spawn
    pub async fn spawn_with_error_handler(
        ctx: Context,
        provider: impl ProvideCredential<Credential = K>,
        handler: impl Fn(Error) + Send + Sync + 'static,
    ) -> Result<Self> {
        Self::spawn_inner(ctx, Arc::new(provider), Some(Arc::new(handler))).await
    }

    async fn spawn_inner(
        ctx: Context,
        provider: Arc<dyn ProvideCredential<Credential = K>>,
        handler: Option<RefreshErrorHandler>,
    ) -> Result<Self> {
        let initial = provider
            .provide_credential(&ctx)
            .await?
            .ok_or_else(|| Error::credential_invalid("credential provider returned nothing"))?;

        let mut delay = delay_until_refresh(&initial);
        let cell = Arc::new(RwLock::new(initial));

        let task = {
            let cell = cell.clone();
            tokio::spawn(async move {
                loop {
                    debug!("next credential refresh scheduled in {delay:?}");
                    tokio::time::sleep(delay).await;

                    match fetch_with_retry(&ctx, provider.as_ref()).await {
                        Ok(cred) => {
                            delay = delay_until_refresh(&cred);
                            // Single writer; readers only ever see complete values.
                            *cell.write().expect("lock poisoned") = cred;
                            debug!("credential refresh completed");
                        }
                        Err(err) => {
                            error!("credential refresh failed after retries: {err}");
                            if let Some(handler) = &handler {
                                handler(err);
                            }
                            delay = DEFAULT_REFRESH_INTERVAL - REFRESH_MARGIN;
                        }
                    }
                }
            })
        };

        Ok(Self { cell, task })
    }

    /// The credential as of the last completed fetch.
    ///
    /// Never blocks on an in-flight refresh; a stale-but-valid value is
    /// returned until the next fetch completes.
    pub fn current(&self) -> K {
        self.cell.read().expect("lock poisoned").clone()
    }
}

impl<K: SigningCredential> Drop for CredentialRefresher<K> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Delay until the next refresh for a just-fetched credential.
fn delay_until_refresh<K: SigningCredential>(cred: &K) -> Duration {
    let delay = match cred.expires_at() {
        Some(exp) => exp
            .signed_duration_since(now())
            .to_std()
            .unwrap_or_default()
            .saturating_sub(REFRESH_MARGIN),
        None => DEFAULT_REFRESH_INTERVAL - REFRESH_MARGIN,
    };

    delay.max(MIN_REFRESH_DELAY)
}

async fn fetch_with_retry<K: SigningCredential>(
    ctx: &Context,
    provider: &dyn ProvideCredential<Credential = K>,
) -> Result<K> {
    let mut backoff = RETRY_BACKOFF_BASE;

    for attempt in 0..=RETRY_BUDGET {
        let err = match provider.provide_credential(ctx).await {
            Ok(Some(cred)) => return Ok(cred),
            Ok(None) => Error::credential_invalid("credential provider returned nothing"),
            Err(err) => err,
        };

        if attempt == RETRY_BUDGET {
            return Err(err);
        }

        warn!("credential refresh attempt {attempt} failed, retrying in {backoff:?}: {err}");
        tokio::time::sleep(backoff).await;
        backoff = (backoff * 2).min(RETRY_BACKOFF_CAP);
    }

    unreachable!("retry loop always returns")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::DateTime;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Clone, Debug, PartialEq)]
    struct TestCredential {
        tag: &'static str,
        expiration: Option<DateTime>,
    }

    impl TestCredential {
        fn new(tag: &'static str) -> Self {
            Self {
                tag,
                expiration: None,
            }
        }

        fn expiring(tag: &'static str, in_secs: i64) -> Self {
            Self {
                tag,
                expiration: Some(now() + chrono::TimeDelta::seconds(in_secs)),
            }
        }
    }

    impl SigningCredential for TestCredential {
        fn is_valid(&self) -> bool {
            true
        }

        fn expires_at(&self) -> Option<DateTime> {
            self.expiration
        }
    }

    #[derive(Debug)]
    struct QueueProvider {
        responses: Mutex<VecDeque<Result<Option<TestCredential>>>>,
    }

    impl QueueProvider {
        fn new(responses: Vec<Result<Option<TestCredential>>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait::async_trait]
    impl ProvideCredential for QueueProvider {
        type Credential = TestCredential;

        async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
            self.responses
                .lock()
                .expect("lock poisoned")
                .pop_front()
                .unwrap_or_else(|| Err(Error::unexpected("provider queue exhausted")))
        }
    }

    // Let the refresher task run after timers have been advanced.
    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_initial_fetch_failure_fails_construction() {
        let provider = QueueProvider::new(vec![Err(Error::unexpected("boom"))]);
        let result = CredentialRefresher::spawn(Context::new(), provider).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_initial_none_fails_construction() {
        let provider = QueueProvider::new(vec![Ok(None)]);
        let result = CredentialRefresher::spawn(Context::new(), provider).await;
        assert!(result.unwrap_err().is_credential_error());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_fires_one_minute_before_expiry() {
        let first = TestCredential::expiring("first", 300);
        let second = TestCredential::new("second");
        let provider = QueueProvider::new(vec![Ok(Some(first.clone())), Ok(Some(second.clone()))]);

        let refresher = CredentialRefresher::spawn(Context::new(), provider)
            .await
            .expect("spawn must succeed");
        // The refresh task must register its timer before the clock moves.
        settle().await;
        assert_eq!(refresher.current(), first);

        // Just shy of the four minute mark: still the original credential.
        tokio::time::advance(Duration::from_secs(235)).await;
        settle().await;
        assert_eq!(refresher.current(), first);

        tokio::time::advance(Duration::from_secs(10)).await;
        settle().await;
        assert_eq!(refresher.current(), second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_defaults_to_hourly_without_expiry() {
        let first = TestCredential::new("first");
        let second = TestCredential::new("second");
        let provider = QueueProvider::new(vec![Ok(Some(first.clone())), Ok(Some(second.clone()))]);

        let refresher = CredentialRefresher::spawn(Context::new(), provider)
            .await
            .expect("spawn must succeed");
        settle().await;

        tokio::time::advance(Duration::from_secs(3538)).await;
        settle().await;
        assert_eq!(refresher.current(), first);

        tokio::time::advance(Duration::from_secs(3)).await;
        settle().await;
        assert_eq!(refresher.current(), second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refresh_retries_and_keeps_last_good() {
        let first = TestCredential::new("first");
        let third = TestCredential::new("third");
        let provider = QueueProvider::new(vec![
            Ok(Some(first.clone())),
            Err(Error::unexpected("transient")),
            Err(Error::unexpected("transient")),
            Ok(Some(third.clone())),
        ]);

        let refresher = CredentialRefresher::spawn(Context::new(), provider)
            .await
            .expect("spawn must succeed");
        settle().await;

        // Past the hourly tick; the first two fetches fail.
        tokio::time::advance(Duration::from_secs(3541)).await;
        settle().await;
        assert_eq!(refresher.current(), first, "last-good kept during backoff");

        // Backoff is 1s then 2s; walk through both retries.
        tokio::time::advance(Duration::from_secs(2)).await;
        settle().await;
        tokio::time::advance(Duration::from_secs(3)).await;
        settle().await;
        assert_eq!(refresher.current(), third);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_surface_through_handler() {
        let first = TestCredential::new("first");
        let mut responses = vec![Ok(Some(first.clone()))];
        for _ in 0..=RETRY_BUDGET {
            responses.push(Err(Error::unexpected("still down")));
        }
        let provider = QueueProvider::new(responses);

        let failures = Arc::new(AtomicUsize::new(0));
        let seen = failures.clone();
        let refresher = CredentialRefresher::spawn_with_error_handler(
            Context::new(),
            provider,
            move |_err| {
                seen.fetch_add(1, Ordering::SeqCst);
            },
        )
        .await
        .expect("spawn must succeed");
        settle().await;

        // Hourly tick plus enough room for every backoff step.
        tokio::time::advance(Duration::from_secs(3541)).await;
        settle().await;
        for _ in 0..=RETRY_BUDGET {
            tokio::time::advance(RETRY_BACKOFF_CAP).await;
            settle().await;
        }

        assert_eq!(failures.load(Ordering::SeqCst), 1);
        assert_eq!(refresher.current(), first, "last-good survives exhaustion");
    }

    #[test]
    fn test_delay_clamped_to_floor_for_near_expiry() {
        let cred = TestCredential::expiring("soon", 30);
        assert_eq!(delay_until_refresh(&cred), MIN_REFRESH_DELAY);

        let cred = TestCredential::expiring("past", -30);
        assert_eq!(delay_until_refresh(&cred), MIN_REFRESH_DELAY);
    }

    #[test]
    fn test_delay_without_expiry_is_hour_minus_margin() {
        let cred = TestCredential::new("static");
        assert_eq!(
            delay_until_refresh(&cred),
            Duration::from_secs(3600) - Duration::from_secs(60)
        );
    }
}
