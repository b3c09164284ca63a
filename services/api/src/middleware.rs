//! Authentication gate for cookie-borne session tokens
//!
//! The gate itself is a pure function from an optional cookie value to
//! an authenticated user, so it is testable without the web framework;
//! the axum middleware around it short-circuits with 401 before any
//! guarded handler runs.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_cookies::{Cookie, Cookies, cookie::time::Duration};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;
use crate::token::{SESSION_TTL_SECS, TokenService};

/// Name of the session cookie
pub const AUTH_COOKIE: &str = "auth_token";

/// Authenticated caller, injected into request extensions by the gate
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
}

/// Verify a session token value; absent, malformed, forged and expired
/// tokens all fail identically
pub fn verify_session(token: Option<&str>, tokens: &TokenService) -> Result<AuthUser, ApiError> {
    let token = token.ok_or(ApiError::Unauthorized)?;
    let id = tokens.verify(token).map_err(|_| ApiError::Unauthorized)?;
    Ok(AuthUser { id })
}

/// Authentication middleware wrapping protected routes
pub async fn auth_middleware(
    State(state): State<AppState>,
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let cookie = cookies.get(AUTH_COOKIE);
    let user = verify_session(cookie.as_ref().map(|c| c.value()), &state.tokens)?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Build the session cookie carrying a freshly issued token
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_secure(secure);
    cookie.set_path("/");
    cookie.set_max_age(Duration::seconds(SESSION_TTL_SECS as i64));
    cookie
}

/// Build the already-expired replacement sent on logout
pub fn expired_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_COOKIE, "");
    cookie.set_http_only(true);
    cookie.set_secure(secure);
    cookie.set_path("/");
    cookie.set_max_age(Duration::seconds(0));
    cookie
}
