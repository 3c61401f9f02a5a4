//! Error types for the anti-forgery core.

use thiserror::Error;

/// Errors produced when constructing a [`crate::HashSigner`].
#[derive(Debug, Error)]
pub enum SignerError {
    /// The configured signing secret is shorter than the required minimum.
    #[error("signing secret too short: {len} bytes, need at least {min}")]
    SecretTooShort {
        /// Length of the secret that was supplied.
        len: usize,
        /// Minimum accepted length.
        min: usize,
    },
}

/// Reasons a mutating request is denied by the [`crate::MutationGuard`].
///
/// These are logged internally but surfaced to the client as one uniform
/// generic bad-request response. The collapse is deliberate: distinguishing
/// the cases in user-visible output would leak which check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DenyReason {
    /// No one-time token was submitted with the request.
    #[error("missing one-time token")]
    MissingToken,

    /// The submitted token does not match the outstanding token for the
    /// user, or the token was already consumed or superseded.
    #[error("invalid or replayed one-time token")]
    InvalidOrReplayedToken,

    /// The resource targeted by a delete does not exist.
    #[error("resource not found")]
    NotFound,

    /// The user is neither the resource owner nor the admin.
    #[error("not authorized to mutate this resource")]
    Forbidden,
}
