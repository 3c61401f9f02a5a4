//! Authenticated bulletin board server.
//!
//! Users post short text messages, view a reverse-chronological feed, and
//! delete their own (or, as admin, any) posts. Every mutation is protected by
//! the anti-forgery core in `board-core`: a one-time token issued when the
//! feed is rendered and a signed tracking cookie that survives across
//! sessions without server-side session storage.
//!
//! # Architecture
//!
//! - **Auth**: HTTP Basic authentication resolves the user name before any
//!   handler runs ([`auth`]).
//! - **Routes**: `GET /posts` renders the feed and mints a token;
//!   `POST /posts` and `POST /posts/delete` are guarded mutations
//!   ([`routes`]).
//! - **Render**: maud compile-time templates; all interpolated content is
//!   HTML-escaped by construction ([`render`]).
//! - **Store**: `SQLite`-backed post persistence ([`store`]).
//!
//! # Security
//!
//! - Guard denials surface as one uniform generic 400; the response never
//!   reveals which check failed.
//! - The feed page carries a `Content-Security-Policy` header.
//! - The signing secret is startup-provisioned and never logged.

pub mod auth;
pub mod config;
pub mod error;
pub mod render;
pub mod routes;
pub mod state;
pub mod store;

pub use routes::app;
pub use state::AppState;
