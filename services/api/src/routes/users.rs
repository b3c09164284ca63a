//! Account routes: registration and the current-user profile

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json, extract::State};
use serde_json::json;
use tower_cookies::Cookies;
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::middleware::{AuthUser, session_cookie};
use crate::models::{RegisterRequest, User, UserProfile};
use crate::password::hash_password;
use crate::state::AppState;
use crate::validation::validate_register;

/// User registration endpoint
///
/// A successful registration logs the new user in immediately by
/// setting the session cookie alongside the response.
pub async fn register(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_register(&payload).map_err(ApiError::Validation)?;

    let user = User {
        id: Uuid::new_v4(),
        email: payload.email,
        password_hash: hash_password(&payload.password)?,
        first_name: payload.first_name,
        last_name: payload.last_name,
    };

    state.credentials.insert_user(user.clone()).await?;

    let token = state.tokens.issue(user.id)?;
    cookies.add(session_cookie(token, state.cookie_secure));

    info!("user registered: {}", user.id);

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": format!("User {} registered successfully", user.email)
        })),
    ))
}

/// Current-user profile; the password hash never leaves the store layer
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<UserProfile>> {
    let user = state
        .credentials
        .find_by_id(user.id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(UserProfile::from(user)))
}
