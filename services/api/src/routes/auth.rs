//! Session routes: login, token validation, logout

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json, extract::State};
use tower_cookies::Cookies;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::middleware::{AuthUser, expired_cookie, session_cookie};
use crate::models::{LoginRequest, LoginResponse};
use crate::password::verify_password;
use crate::state::AppState;
use crate::validation::validate_login;

/// User login endpoint
///
/// An unknown email and a wrong password fail identically so responses
/// carry no account-enumeration signal.
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_login(&payload).map_err(ApiError::Validation)?;

    let user = state
        .credentials
        .find_by_email(&payload.email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.tokens.issue(user.id)?;
    cookies.add(session_cookie(token, state.cookie_secure));

    info!("user logged in: {}", user.id);

    Ok((StatusCode::OK, Json(LoginResponse { user_id: user.id })))
}

/// Report the user id embedded in a valid session cookie
pub async fn validate_token(Extension(user): Extension<AuthUser>) -> Json<LoginResponse> {
    Json(LoginResponse { user_id: user.id })
}

/// Logout endpoint
///
/// Sessions are invalidated by expiry only; logging out just replaces
/// the client's cookie with an already-expired one.
pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> impl IntoResponse {
    cookies.add(expired_cookie(state.cookie_secure));
    StatusCode::OK
}
