//! Router and request handlers.
//!
//! `GET /posts` renders the feed, resolves (or re-issues) the tracking
//! cookie, and mints the user's one-time token. `POST /posts` and
//! `POST /posts/delete` are guarded mutations: the submitted token is
//! consumed first, then (for deletes) existence and ownership are checked,
//! and on success the client is redirected 303 back to the feed.
//!
//! Every route sits behind the Basic-auth middleware; the cookie layer wraps
//! everything so the tracking cookie can be read and set from any handler.

use axum::extract::rejection::FormRejection;
use axum::http::{StatusCode, header};
use axum::middleware;
use axum::response::{IntoResponse, Redirect};
use axum::routing::{get, post};
use axum::{Extension, Form, Router, extract::State};
use board_core::{MutationGuard, TRACKING_COOKIE_KEY};
use board_core::tracking::TRACKING_COOKIE_TTL_HOURS;
use serde::Deserialize;
use tower_cookies::cookie::time::{Duration, OffsetDateTime};
use tower_cookies::{Cookie, CookieManagerLayer, Cookies};
use tracing::info;

use crate::auth::{self, AuthUser};
use crate::error::AppError;
use crate::render;
use crate::state::SharedState;

/// Content-Security-Policy sent with the feed page.
const CSP: &str = "default-src 'self'; script-src https://*; style-src https://*";

/// Builds the application router.
pub fn app(state: SharedState) -> Router {
    Router::new()
        .route(
            "/posts",
            get(show_posts).post(create_post).fallback(bad_request),
        )
        .route("/posts/delete", post(delete_post).fallback(bad_request))
        .route("/logout", get(logout))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_basic_auth,
        ))
        .layer(CookieManagerLayer::new())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct CreatePostForm {
    content: String,
    #[serde(rename = "oneTimeToken", default)]
    one_time_token: String,
}

#[derive(Debug, Deserialize)]
struct DeletePostForm {
    id: i64,
    #[serde(rename = "oneTimeToken", default)]
    one_time_token: String,
}

/// GET /posts — render the feed and mint a fresh one-time token.
async fn show_posts(
    State(state): State<SharedState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    let tracking_id = resolve_tracking(&state, &cookies, &user);
    let one_time_token = state.tokens.issue(&user);
    let posts = state.store.find_all_desc()?;

    info!(user = %user, tracking_id = %tracking_id, "feed viewed");

    Ok((
        [(header::CONTENT_SECURITY_POLICY, CSP)],
        render::posts_page(&posts, &user, &one_time_token),
    ))
}

/// POST /posts — guarded create, then 303 back to the feed.
async fn create_post(
    State(state): State<SharedState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    cookies: Cookies,
    form: Result<Form<CreatePostForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form.map_err(|_| AppError::BadRequest)?;
    let tracking_id = resolve_tracking(&state, &cookies, &user);

    MutationGuard::new(&state.tokens).authorize_create(&user, &form.one_time_token)?;

    let created = state.store.create(&form.content, &user, &tracking_id)?;
    info!(user = %user, post_id = created.id, "post created");

    Ok(Redirect::to("/posts"))
}

/// POST /posts/delete — guarded delete, then 303 back to the feed.
async fn delete_post(
    State(state): State<SharedState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    form: Result<Form<DeletePostForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form.map_err(|_| AppError::BadRequest)?;

    let target = state.store.find_by_id(form.id)?;
    let owner = target.as_ref().map(|p| p.posted_by.as_str());

    MutationGuard::new(&state.tokens).authorize_delete(&user, &form.one_time_token, owner)?;

    state.store.delete(form.id)?;
    info!(user = %user, post_id = form.id, "post deleted");

    Ok(Redirect::to("/posts"))
}

/// GET /logout — a 401 page; the browser drops its cached credentials.
async fn logout() -> impl IntoResponse {
    (StatusCode::UNAUTHORIZED, render::logged_out_page())
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "404 not found")
}

async fn bad_request() -> impl IntoResponse {
    (StatusCode::BAD_REQUEST, "400 bad request")
}

/// Resolves the tracking identity for this request, setting the cookie only
/// when a fresh one was minted. Absent, malformed, and forged cookies all
/// take the fresh path.
fn resolve_tracking(state: &SharedState, cookies: &Cookies, user: &str) -> String {
    let presented = cookies
        .get(TRACKING_COOKIE_KEY)
        .map(|c| c.value().to_string());
    let resolution = state.tracking.resolve(presented.as_deref(), user);

    if resolution.is_fresh() {
        let expires = OffsetDateTime::now_utc() + Duration::hours(TRACKING_COOKIE_TTL_HOURS);
        let cookie = Cookie::build((TRACKING_COOKIE_KEY, resolution.value().to_string()))
            .path("/")
            .http_only(true)
            .expires(expires)
            .build();
        cookies.add(cookie);
    }
    resolution.value().to_string()
}
