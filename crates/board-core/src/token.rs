//! Per-user one-time tokens.
//!
//! A token is issued when the user's feed is rendered and must accompany the
//! next mutating request from that user. The map holds at most one
//! outstanding token per user: a newer render overwrites (supersedes) any
//! unused token, and a consumed token is deleted. Either way, a token can
//! authorize at most one mutation.
//!
//! # Concurrency
//!
//! Handlers suspend between reading a request body and touching this store,
//! so two requests from the same user can interleave. `consume` therefore
//! performs its check-and-delete as one atomic step under a sync mutex with
//! no intervening suspension point; of two racing consumers of the same
//! token, exactly one succeeds. The lock is never held across an `.await`.
//!
//! State is process-lifetime only: a restart invalidates all outstanding
//! tokens, forcing a fresh render. A minted token has no expiry clock beyond
//! "the next render overwrites it".

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use rand::RngCore;
use rand::rngs::OsRng;
use subtle::ConstantTimeEq;

/// Length of a one-time token in random bytes (hex-encoded to twice this).
pub const TOKEN_LEN_BYTES: usize = 16;

/// Process-wide map from user name to the single outstanding token.
#[derive(Debug, Default)]
pub struct OneTimeTokenStore {
    entries: Mutex<HashMap<String, String>>,
}

impl OneTimeTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a fresh token for `user_name`, overwriting any previous one.
    ///
    /// The returned value is [`TOKEN_LEN_BYTES`] bytes from the OS
    /// cryptographic random source, lowercase hex.
    pub fn issue(&self, user_name: &str) -> String {
        let mut bytes = [0u8; TOKEN_LEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        entries.insert(user_name.to_string(), token.clone());
        token
    }

    /// Atomically consumes the outstanding token for `user_name`.
    ///
    /// Returns `true` and deletes the entry iff one exists and equals
    /// `submitted` (constant-time comparison). On mismatch or absence the
    /// state is left unchanged and `false` is returned.
    pub fn consume(&self, user_name: &str, submitted: &str) -> bool {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let matches = entries
            .get(user_name)
            .is_some_and(|stored| stored.as_bytes().ct_eq(submitted.as_bytes()).into());

        if matches {
            entries.remove(user_name);
        }
        matches
    }

    /// Number of users with an outstanding token.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn issued_token_is_hex_of_expected_length() {
        let store = OneTimeTokenStore::new();
        let token = store.issue("alice");
        assert_eq!(token.len(), TOKEN_LEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn consume_matching_token_succeeds_once() {
        let store = OneTimeTokenStore::new();
        let token = store.issue("alice");

        assert!(store.consume("alice", &token));
        // Replay after a successful consume is rejected.
        assert!(!store.consume("alice", &token));
        assert_eq!(store.outstanding(), 0);
    }

    #[test]
    fn mismatched_token_leaves_state_unchanged() {
        let store = OneTimeTokenStore::new();
        let token = store.issue("alice");

        assert!(!store.consume("alice", "not-the-token"));
        // The real token still works afterwards.
        assert!(store.consume("alice", &token));
    }

    #[test]
    fn consume_for_unknown_user_fails() {
        let store = OneTimeTokenStore::new();
        assert!(!store.consume("nobody", "anything"));
    }

    #[test]
    fn newer_issue_supersedes_previous_token() {
        let store = OneTimeTokenStore::new();
        let first = store.issue("alice");
        let second = store.issue("alice");

        assert!(!store.consume("alice", &first));
        assert!(store.consume("alice", &second));
    }

    #[test]
    fn tokens_are_scoped_per_user() {
        let store = OneTimeTokenStore::new();
        let alice = store.issue("alice");
        let bob = store.issue("bob");

        assert!(!store.consume("bob", &alice));
        assert!(store.consume("alice", &alice));
        assert!(store.consume("bob", &bob));
    }

    #[test]
    fn racing_consumers_observe_exactly_one_success() {
        let store = Arc::new(OneTimeTokenStore::new());
        let token = store.issue("alice");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let token = token.clone();
                std::thread::spawn(move || store.consume("alice", &token))
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);
    }
}
