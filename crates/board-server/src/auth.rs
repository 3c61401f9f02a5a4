//! HTTP Basic authentication middleware.
//!
//! Resolves the user name before any handler runs and inserts it into the
//! request extensions as [`AuthUser`]. Handlers treat the name as an opaque
//! trusted string; the literal user `admin` carries universal delete
//! authorization downstream.
//!
//! Password comparison is constant-time. An unknown user and a wrong
//! password are indistinguishable: both receive the same 401 challenge.

use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use subtle::ConstantTimeEq;

use crate::state::SharedState;

/// Authenticated user name, inserted into request extensions.
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

/// Middleware enforcing Basic authentication on every route.
pub async fn require_basic_auth(
    State(state): State<SharedState>,
    mut request: Request,
    next: Next,
) -> Response {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match authorization.and_then(|header| verify_credentials(&state, header)) {
        Some(user) => {
            request.extensions_mut().insert(AuthUser(user));
            next.run(request).await
        },
        None => challenge(),
    }
}

/// Decodes `Basic <base64(user:password)>` and checks it against the user
/// table. Returns the user name on success.
fn verify_credentials(state: &SharedState, header: &str) -> Option<String> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let credentials = String::from_utf8(decoded).ok()?;
    let (user, password) = credentials.split_once(':')?;

    let expected = state.users.get(user)?;
    let ok: bool = expected.as_bytes().ct_eq(password.as_bytes()).into();
    ok.then(|| user.to_string())
}

fn challenge() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"Secret board\"")],
        "401 authentication required",
    )
        .into_response()
}
