//! HTTP routes for the booking API

pub mod auth;
pub mod hotels;
pub mod my_hotels;
pub mod users;

use axum::http::{HeaderValue, Method, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use tower_cookies::CookieManagerLayer;
use tower_http::cors::CorsLayer;

use crate::middleware::auth_middleware;
use crate::state::AppState;

/// Create the router for the booking API
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/auth/validate-token", get(auth::validate_token))
        .route("/users/me", get(users::me))
        .route(
            "/hotels/:hotel_id/bookings/payment-intent",
            post(hotels::create_payment_intent),
        )
        .route("/hotels/:hotel_id/bookings", post(hotels::create_booking))
        .route(
            "/my-hotels",
            get(my_hotels::list_hotels).post(my_hotels::create_hotel),
        )
        .route(
            "/my-hotels/:hotel_id",
            get(my_hotels::get_hotel).put(my_hotels::update_hotel),
        )
        .route("/my-bookings", get(my_hotels::list_bookings))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/users/register", post(users::register))
        .route("/hotels/search", get(hotels::search))
        .route("/hotels/:hotel_id", get(hotels::get_hotel))
        .merge(protected);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(CookieManagerLayer::new())
        .with_state(state)
}

/// Create the router with cross-origin access granted to the front end
pub fn create_router_with_origin(state: AppState, origin: &str) -> anyhow::Result<Router> {
    let origin = origin
        .parse::<HeaderValue>()
        .map_err(|e| anyhow::anyhow!("Invalid front-end origin: {}", e))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(create_router(state).layer(cors))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "booking-api"
    }))
}
