//! Cached bearer token for the adoption provider.
//!
//! The cache lives for the whole process. It starts empty, refreshes once the
//! stored token expires, and holds its async mutex across the refresh so only
//! one caller talks to the token endpoint at a time.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tokio::sync::Mutex;
use tracing::debug;
use zeroize::Zeroizing;

/// Bearer token; the buffer is wiped on drop and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// Raw token for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Token issued by the credential endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: AccessToken,
    pub expires_in: Duration,
}

#[derive(Debug)]
struct CachedToken {
    token: AccessToken,
    expires_at: DateTime<Utc>,
}

/// Process-wide token cache.
pub struct TokenCache {
    clock: Arc<dyn Clock>,
    slot: Mutex<Option<CachedToken>>,
}

impl fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCache").finish_non_exhaustive()
    }
}

impl TokenCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            slot: Mutex::new(None),
        }
    }

    /// Return the cached token while `now < expiry`, otherwise run `refresh`
    /// and store its grant.
    ///
    /// # Errors
    ///
    /// Propagates the refresh error; the previous entry is discarded.
    pub async fn get_or_refresh<F, Fut, E>(&self, refresh: F) -> Result<AccessToken, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<TokenGrant, E>>,
    {
        let mut slot = self.slot.lock().await;
        let now = self.clock.utc();
        if let Some(cached) = slot.as_ref().filter(|cached| now < cached.expires_at) {
            return Ok(cached.token.clone());
        }
        *slot = None;

        let grant = refresh().await?;
        let lifetime = TimeDelta::from_std(grant.expires_in).unwrap_or(TimeDelta::MAX);
        let expires_at = now.checked_add_signed(lifetime).unwrap_or(DateTime::<Utc>::MAX_UTC);
        debug!(%expires_at, "adoption token refreshed");
        let token = grant.access_token;
        *slot = Some(CachedToken {
            token: token.clone(),
            expires_at,
        });
        Ok(token)
    }

    /// Drop any cached token.
    pub async fn invalidate(&self) {
        self.slot.lock().await.take();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{Local, TimeZone};

    use super::*;

    struct SteppingClock(StdMutex<DateTime<Utc>>);

    impl SteppingClock {
        fn new() -> Self {
            let start = Utc
                .with_ymd_and_hms(2026, 1, 1, 12, 0, 0)
                .single()
                .expect("valid start time");
            Self(StdMutex::new(start))
        }

        fn advance_seconds(&self, seconds: i64) {
            *self.0.lock().expect("clock lock") += TimeDelta::seconds(seconds);
        }
    }

    impl Clock for SteppingClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.0.lock().expect("clock lock")
        }
    }

    fn grant(token: &str, seconds: u64) -> TokenGrant {
        TokenGrant {
            access_token: AccessToken::new(token),
            expires_in: Duration::from_secs(seconds),
        }
    }

    async fn fetch(cache: &TokenCache, calls: &AtomicUsize, token: &str) -> AccessToken {
        cache
            .get_or_refresh(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(grant(token, 3600))
            })
            .await
            .expect("refresh succeeds")
    }

    #[tokio::test]
    async fn reuses_token_before_expiry() {
        let clock = Arc::new(SteppingClock::new());
        let cache = TokenCache::new(clock.clone());
        let calls = AtomicUsize::new(0);

        let first = fetch(&cache, &calls, "first").await;
        clock.advance_seconds(3599);
        let second = fetch(&cache, &calls, "second").await;

        assert_eq!(first.expose(), "first");
        assert_eq!(second.expose(), "first");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn refreshes_at_expiry() {
        let clock = Arc::new(SteppingClock::new());
        let cache = TokenCache::new(clock.clone());
        let calls = AtomicUsize::new(0);

        fetch(&cache, &calls, "first").await;
        clock.advance_seconds(3600);
        let renewed = fetch(&cache, &calls, "second").await;

        assert_eq!(renewed.expose(), "second");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_refresh_leaves_cache_empty() {
        let cache = TokenCache::new(Arc::new(SteppingClock::new()));
        let calls = AtomicUsize::new(0);

        let failure = cache
            .get_or_refresh(|| async { Err::<TokenGrant, _>("denied") })
            .await;
        assert_eq!(failure, Err("denied"));

        fetch(&cache, &calls, "next").await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_refresh() {
        let cache = TokenCache::new(Arc::new(SteppingClock::new()));
        let calls = AtomicUsize::new(0);

        fetch(&cache, &calls, "first").await;
        cache.invalidate().await;
        let renewed = fetch(&cache, &calls, "second").await;

        assert_eq!(renewed.expose(), "second");
    }

    #[test]
    fn debug_output_redacts_token() {
        let token = AccessToken::new("super-secret");
        assert_eq!(format!("{token:?}"), "AccessToken(<redacted>)");
    }
}
