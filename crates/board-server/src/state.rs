//! Shared application state.
//!
//! One `Arc<AppState>` is built at startup and handed to every handler via
//! axum's `State`. It owns the three pieces of process-lifetime state: the
//! tracking cookie manager (wrapping the signing secret), the one-time token
//! store, and the post store. None of it is persisted; a restart invalidates
//! all outstanding tokens.

use std::collections::HashMap;
use std::sync::Arc;

use board_core::{HashSigner, OneTimeTokenStore, TrackingCookieManager};
use board_core::error::SignerError;
use secrecy::SecretString;

use crate::store::PostStore;

/// Shared handle to application state.
pub type SharedState = Arc<AppState>;

/// Process-wide application state.
pub struct AppState {
    /// Tracking identity issuance and validation.
    pub tracking: TrackingCookieManager,
    /// Outstanding one-time tokens, one per user.
    pub tokens: OneTimeTokenStore,
    /// Post persistence.
    pub store: PostStore,
    /// Basic-auth user table (user name -> password).
    pub users: HashMap<String, String>,
}

impl AppState {
    /// Builds the shared state from startup inputs.
    ///
    /// # Errors
    ///
    /// Fails if the signing secret does not meet the minimum length.
    pub fn new(
        secret: SecretString,
        store: PostStore,
        users: HashMap<String, String>,
    ) -> Result<SharedState, SignerError> {
        let signer = HashSigner::new(secret)?;
        Ok(Arc::new(Self {
            tracking: TrackingCookieManager::new(signer),
            tokens: OneTimeTokenStore::new(),
            store,
            users,
        }))
    }
}
