//! Public hotel routes: search, detail, and the booking flow

use axum::extract::{Path, State};
use axum::{Extension, Json};
use axum_extra::extract::Query;
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::{Booking, BookingRequest, Hotel, HotelSearchResponse, QuoteRequest, QuoteResponse};
use crate::payment::{PaymentMetadata, STATUS_SUCCEEDED};
use crate::search::{SearchFilters, SearchParams, SortOption, page_number, paginate};
use crate::state::AppState;
use crate::store::BookingAppend;

/// Hotel search endpoint
///
/// Filter values that fail to parse drop the filter rather than failing
/// the request, so a mangled query string still returns results.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<HotelSearchResponse>> {
    let filters = SearchFilters::from_params(&params);
    let sort = SortOption::parse(params.sort_option.as_deref());
    let page = page_number(params.page.as_deref());

    let result = state.catalog.search(&filters, sort, page).await?;

    Ok(Json(HotelSearchResponse {
        pagination: paginate(result.total, page),
        data: result.hotels,
    }))
}

/// Hotel detail endpoint
pub async fn get_hotel(
    State(state): State<AppState>,
    Path(hotel_id): Path<Uuid>,
) -> ApiResult<Json<Hotel>> {
    let hotel = state
        .catalog
        .hotel_by_id(hotel_id)
        .await?
        .ok_or(ApiError::NotFound("Hotel"))?;

    Ok(Json(hotel))
}

/// Open a payment transaction for a stay
///
/// The total is always recomputed from the hotel's current nightly
/// price; the client never supplies an amount.
pub async fn create_payment_intent(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(hotel_id): Path<Uuid>,
    Json(payload): Json<QuoteRequest>,
) -> ApiResult<Json<QuoteResponse>> {
    let nights = payload
        .number_of_nights
        .filter(|&n| n >= 1)
        .ok_or_else(|| ApiError::invalid("numberOfNights", "Number of nights must be a positive number"))?;

    let hotel = state
        .catalog
        .hotel_by_id(hotel_id)
        .await?
        .ok_or(ApiError::NotFound("Hotel"))?;

    // Checked arithmetic: a huge nights value must not wrap the amount
    // sent to the provider
    let too_large = || ApiError::invalid("numberOfNights", "Number of nights is too large");
    let total_cost = hotel
        .price_per_night
        .checked_mul(nights)
        .ok_or_else(too_large)?;
    let amount = total_cost.checked_mul(100).ok_or_else(too_large)?;

    let intent = state
        .payments
        .create_intent(amount, "cad", PaymentMetadata::new(hotel_id, user.id))
        .await?;

    let client_secret = intent
        .client_secret
        .ok_or_else(|| anyhow::anyhow!("payment provider returned no client secret"))?;

    Ok(Json(QuoteResponse {
        payment_intent_id: intent.id,
        client_secret,
        total_cost,
    }))
}

/// Record a booking against a confirmed payment transaction
///
/// The transaction's metadata must match the hotel in the path and the
/// authenticated caller, and its status must be `succeeded`. The cost
/// written to the booking comes from the transaction amount, not the
/// request body.
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(hotel_id): Path<Uuid>,
    Json(payload): Json<BookingRequest>,
) -> ApiResult<Json<Value>> {
    let intent = state
        .payments
        .retrieve_intent(&payload.payment_intent_id)
        .await?
        .ok_or(ApiError::NotFound("Payment intent"))?;

    if intent.metadata != PaymentMetadata::new(hotel_id, user.id) {
        return Err(ApiError::Forbidden);
    }

    if intent.status != STATUS_SUCCEEDED {
        return Err(ApiError::PaymentIncomplete(intent.status));
    }

    let booking = Booking {
        id: Uuid::new_v4(),
        user_id: user.id,
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        adult_count: payload.adult_count,
        child_count: payload.child_count,
        check_in: payload.check_in,
        check_out: payload.check_out,
        total_cost: intent.amount / 100,
        payment_intent_id: intent.id,
    };

    match state.catalog.append_booking(hotel_id, booking).await? {
        BookingAppend::HotelMissing => Err(ApiError::NotFound("Hotel")),
        BookingAppend::AlreadyRecorded => {
            Ok(Json(json!({ "message": "Booking already recorded" })))
        }
        BookingAppend::Appended => {
            info!("booking recorded for hotel {}", hotel_id);
            Ok(Json(json!({ "message": "Booking successful" })))
        }
    }
}
