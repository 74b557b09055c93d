//! Client credentials for the adoption provider.

use std::fmt;

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// OAuth client-credentials pair. The secret is wiped on drop.
#[derive(Clone)]
pub struct ClientCredentials {
    client_id: String,
    client_secret: Zeroizing<String>,
}

impl ClientCredentials {
    /// Pair a client id with its secret; blank values yield `None`.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Option<Self> {
        let client_id = client_id.into().trim().to_owned();
        let client_secret = Zeroizing::new(client_secret.into());
        if client_id.is_empty() || client_secret.trim().is_empty() {
            return None;
        }
        Some(Self {
            client_id,
            client_secret,
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(super) fn client_secret(&self) -> &str {
        self.client_secret.as_str()
    }

    /// Truncated SHA-256 of the secret, safe to log.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pawscout::outbound::petfinder::ClientCredentials;
    ///
    /// let credentials = ClientCredentials::new("id", "secret").expect("credentials");
    /// let fp = credentials.secret_fingerprint();
    ///
    /// assert_eq!(fp.len(), 16);
    /// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    /// ```
    #[must_use]
    pub fn secret_fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.client_secret.as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..FINGERPRINT_BYTES])
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}
