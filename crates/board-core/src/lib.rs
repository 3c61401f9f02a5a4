//! Anti-forgery core for the secret board.
//!
//! This crate contains the pieces of the bulletin board with real design
//! content, kept free of any I/O so they can be tested in isolation:
//!
//! - [`HashSigner`] — keyed digest binding a tracking identifier to a user
//!   name with a process-wide secret.
//! - [`TrackingCookieManager`] — validates and mints the self-verifying
//!   `{id}_{signature}` tracking identity carried in a client cookie.
//! - [`OneTimeTokenStore`] — one outstanding random token per user, issued
//!   when the feed is rendered and consumed (atomically checked-and-deleted)
//!   by the next mutating request.
//! - [`MutationGuard`] — the ordered policy applied to every state-changing
//!   request: one-time token first, then existence and ownership.
//!
//! # Security Invariants
//!
//! - The signing secret never leaves this crate; it is held as a
//!   [`secrecy::SecretString`] and only exposed to key the MAC.
//! - All digest and token comparisons are constant-time
//!   (`subtle::ConstantTimeEq`).
//! - Tracking identifiers and one-time tokens are drawn from the OS
//!   cryptographic random source, never a general-purpose PRNG.
//! - `consume` is a single atomic check-and-delete: two racing consumers of
//!   the same token observe exactly one success.

pub mod error;
pub mod guard;
pub mod signer;
pub mod token;
pub mod tracking;

pub use error::{DenyReason, SignerError};
pub use guard::{ADMIN_USER, MutationGuard};
pub use signer::HashSigner;
pub use token::OneTimeTokenStore;
pub use tracking::{Resolution, TRACKING_COOKIE_KEY, TrackingCookieManager};
