//! Owner routes: hotel CRUD over multipart forms and booking listings

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::{Hotel, HotelForm};
use crate::state::AppState;
use crate::validation::validate_hotel_form;

/// Maximum number of image files accepted when creating a hotel
pub const MAX_IMAGES_PER_CREATE: usize = 6;

/// A parsed multipart hotel form: text fields plus raw image files
struct HotelUpload {
    form: HotelForm,
    images: Vec<(Vec<u8>, String)>,
}

async fn read_hotel_form(mut multipart: Multipart) -> ApiResult<HotelUpload> {
    let mut form = HotelForm::default();
    let mut images = Vec::new();

    let malformed = |_| ApiError::invalid("form", "Malformed multipart payload");

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == "imageFiles" {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await.map_err(malformed)?;
            images.push((bytes.to_vec(), content_type));
            continue;
        }

        let text = field.text().await.map_err(malformed)?;
        match name.as_str() {
            "name" => form.name = Some(text),
            "city" => form.city = Some(text),
            "country" => form.country = Some(text),
            "description" => form.description = Some(text),
            "type" => form.hotel_type = Some(text),
            "pricePerNight" => form.price_per_night = Some(text),
            "starRating" => form.star_rating = Some(text),
            "adultCount" => form.adult_count = Some(text),
            "childCount" => form.child_count = Some(text),
            "facilities" => form.facilities.push(text),
            "imageUrls" => form.image_urls.push(text),
            _ => {}
        }
    }

    Ok(HotelUpload { form, images })
}

async fn upload_images(state: &AppState, images: &[(Vec<u8>, String)]) -> ApiResult<Vec<String>> {
    let mut urls = Vec::with_capacity(images.len());
    for (bytes, content_type) in images {
        urls.push(state.images.upload(bytes, content_type).await?);
    }
    Ok(urls)
}

/// Create a hotel from a multipart form
pub async fn create_hotel(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Hotel>)> {
    let upload = read_hotel_form(multipart).await?;
    let fields = validate_hotel_form(&upload.form).map_err(ApiError::Validation)?;

    if upload.images.len() > MAX_IMAGES_PER_CREATE {
        return Err(ApiError::invalid(
            "imageFiles",
            "At most 6 images can be uploaded",
        ));
    }

    let image_urls = upload_images(&state, &upload.images).await?;

    let hotel = Hotel {
        id: Uuid::new_v4(),
        user_id: user.id,
        name: fields.name,
        city: fields.city,
        country: fields.country,
        description: fields.description,
        hotel_type: fields.hotel_type,
        price_per_night: fields.price_per_night,
        star_rating: fields.star_rating,
        adult_count: fields.adult_count,
        child_count: fields.child_count,
        facilities: fields.facilities,
        image_urls,
        last_updated: Utc::now(),
        bookings: Vec::new(),
    };

    state.catalog.insert_hotel(hotel.clone()).await?;

    info!("hotel created: {} by {}", hotel.id, user.id);

    Ok((StatusCode::CREATED, Json(hotel)))
}

/// List the caller's hotels
pub async fn list_hotels(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Vec<Hotel>>> {
    let hotels = state.catalog.hotels_owned_by(user.id).await?;
    Ok(Json(hotels))
}

/// Fetch one of the caller's hotels
///
/// A hotel owned by someone else is indistinguishable from a missing
/// one.
pub async fn get_hotel(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(hotel_id): Path<Uuid>,
) -> ApiResult<Json<Hotel>> {
    let hotel = state
        .catalog
        .owned_hotel(hotel_id, user.id)
        .await?
        .ok_or(ApiError::NotFound("Hotel"))?;

    Ok(Json(hotel))
}

/// Replace a hotel's attributes from a multipart form
///
/// Freshly uploaded image URLs are prepended to whichever existing URLs
/// the form retained. Bookings are never touched by an update.
pub async fn update_hotel(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(hotel_id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<Json<Hotel>> {
    let existing = state
        .catalog
        .owned_hotel(hotel_id, user.id)
        .await?
        .ok_or(ApiError::NotFound("Hotel"))?;

    let upload = read_hotel_form(multipart).await?;
    let fields = validate_hotel_form(&upload.form).map_err(ApiError::Validation)?;

    let mut image_urls = upload_images(&state, &upload.images).await?;
    image_urls.extend(upload.form.image_urls);

    let hotel = Hotel {
        id: existing.id,
        user_id: existing.user_id,
        name: fields.name,
        city: fields.city,
        country: fields.country,
        description: fields.description,
        hotel_type: fields.hotel_type,
        price_per_night: fields.price_per_night,
        star_rating: fields.star_rating,
        adult_count: fields.adult_count,
        child_count: fields.child_count,
        facilities: fields.facilities,
        image_urls,
        last_updated: Utc::now(),
        bookings: existing.bookings,
    };

    let stored = state
        .catalog
        .update_owned_hotel(hotel)
        .await?
        .ok_or(ApiError::NotFound("Hotel"))?;

    Ok(Json(stored))
}

/// List hotels holding at least one booking by the caller, with each
/// hotel's bookings narrowed to the caller's own
pub async fn list_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Vec<Hotel>>> {
    let hotels = state.catalog.hotels_booked_by(user.id).await?;
    Ok(Json(hotels))
}
