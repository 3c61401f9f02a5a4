//! Self-verifying tracking identity.
//!
//! The tracking identity correlates a user's activity across requests
//! without any server-side session storage. It is a composite value
//! `{original_id}_{signature}` where `original_id` is a random `u64` and
//! `signature` is the keyed digest of `(original_id, user_name)`. The server
//! holds no copy; the value is fully reconstructible from the cookie's own
//! fields plus the secret.
//!
//! A malformed, missing, or forged value (including a value minted for a
//! different user) is indistinguishable in outcome: all paths mint a fresh
//! identity. The caller is told whether the identity is fresh so it can set
//! the cookie only when one was actually issued.

use rand::RngCore;
use rand::rngs::OsRng;

use crate::signer::HashSigner;

/// Cookie key under which the tracking identity travels.
pub const TRACKING_COOKIE_KEY: &str = "tracking_id";

/// Lifetime of a freshly issued tracking cookie, in hours.
///
/// The expiry is absolute from issuance and enforced by the client-side
/// cookie store; the server never re-checks it.
pub const TRACKING_COOKIE_TTL_HOURS: i64 = 24;

/// Outcome of resolving the presented tracking cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The presented value verified for this user; returned unchanged and
    /// no cookie should be re-set.
    Existing(String),
    /// No valid value was presented; a fresh identity was minted and the
    /// caller must set the cookie with the configured absolute expiry.
    Fresh(String),
}

impl Resolution {
    /// The composite tracking identity, however it was obtained.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Existing(v) | Self::Fresh(v) => v,
        }
    }

    /// True when a new identity was minted on this request.
    #[must_use]
    pub const fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh(_))
    }
}

/// Issues and validates composite tracking identities.
pub struct TrackingCookieManager {
    signer: HashSigner,
}

impl TrackingCookieManager {
    /// Creates a manager around the process-wide signer.
    #[must_use]
    pub const fn new(signer: HashSigner) -> Self {
        Self { signer }
    }

    /// Resolves the presented cookie value for `user_name`.
    ///
    /// Validation: split on the first `_` into `(original_id, signature)`
    /// and verify the signature against the keyed digest for this user.
    /// Absent, malformed, and forged values all fall through to minting a
    /// fresh identity.
    #[must_use]
    pub fn resolve(&self, presented: Option<&str>, user_name: &str) -> Resolution {
        if let Some(value) = presented {
            if self.is_valid(value, user_name) {
                return Resolution::Existing(value.to_string());
            }
        }
        Resolution::Fresh(self.mint(user_name))
    }

    /// Checks a composite value against the signature for `user_name`.
    fn is_valid(&self, value: &str, user_name: &str) -> bool {
        match value.split_once('_') {
            Some((original_id, signature)) => {
                self.signer.verify(original_id, user_name, signature)
            },
            None => false,
        }
    }

    /// Mints a fresh `{id}_{signature}` identity for `user_name`.
    fn mint(&self, user_name: &str) -> String {
        let original_id = OsRng.next_u64();
        let id = original_id.to_string();
        let signature = self.signer.sign(&id, user_name);
        format!("{id}_{signature}")
    }
}
