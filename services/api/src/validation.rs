//! Input validation utilities
//!
//! Validation failures are collected per field so a response can report
//! every problem at once.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::FieldError;
use crate::models::{HotelForm, LoginRequest, RegisterRequest};

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    })
}

/// Validate a registration payload
pub fn validate_register(payload: &RegisterRequest) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if payload.first_name.trim().is_empty() {
        errors.push(FieldError::new("firstName", "First name is required"));
    }

    if payload.last_name.trim().is_empty() {
        errors.push(FieldError::new("lastName", "Last name is required"));
    }

    if !email_regex().is_match(&payload.email) {
        errors.push(FieldError::new("email", "Email is required"));
    }

    if payload.password.len() < 6 {
        errors.push(FieldError::new(
            "password",
            "Password is required and must be at least 6 characters",
        ));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Validate a login payload
pub fn validate_login(payload: &LoginRequest) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if !email_regex().is_match(&payload.email) {
        errors.push(FieldError::new("email", "Email is required"));
    }

    if payload.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Hotel attributes after validation, with numeric fields parsed
#[derive(Debug, Clone)]
pub struct HotelFields {
    pub name: String,
    pub city: String,
    pub country: String,
    pub description: String,
    pub hotel_type: String,
    pub price_per_night: i64,
    pub star_rating: i32,
    pub adult_count: i32,
    pub child_count: i32,
    pub facilities: Vec<String>,
}

/// Validate the text fields of a hotel create/update form
pub fn validate_hotel_form(form: &HotelForm) -> Result<HotelFields, Vec<FieldError>> {
    let mut errors = Vec::new();

    let required = |value: &Option<String>, field: &str, message: &str, errors: &mut Vec<FieldError>| {
        match value.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => Some(v.to_string()),
            _ => {
                errors.push(FieldError::new(field, message));
                None
            }
        }
    };

    let name = required(&form.name, "name", "Name is required", &mut errors);
    let city = required(&form.city, "city", "City is required", &mut errors);
    let country = required(&form.country, "country", "Country is required", &mut errors);
    let description = required(
        &form.description,
        "description",
        "Description is required",
        &mut errors,
    );
    let hotel_type = required(&form.hotel_type, "type", "Hotel type is required", &mut errors);

    let price_per_night = match form.price_per_night.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => match raw.parse::<i64>() {
            Ok(price) if price >= 0 => Some(price),
            _ => {
                errors.push(FieldError::new(
                    "pricePerNight",
                    "Price per night must be a number",
                ));
                None
            }
        },
        _ => {
            errors.push(FieldError::new("pricePerNight", "Price per night is required"));
            None
        }
    };

    let star_rating = match form.star_rating.as_deref().map(str::trim).and_then(|s| s.parse::<i32>().ok()) {
        Some(stars) if (1..=5).contains(&stars) => Some(stars),
        _ => {
            errors.push(FieldError::new(
                "starRating",
                "Star rating must be between 1 and 5",
            ));
            None
        }
    };

    let parse_count = |raw: &Option<String>, field: &str, errors: &mut Vec<FieldError>| {
        match raw.as_deref().map(str::trim).and_then(|s| s.parse::<i32>().ok()) {
            Some(count) if count >= 0 => Some(count),
            _ => {
                errors.push(FieldError::new(field, "Guest count must be a non-negative number"));
                None
            }
        }
    };

    let adult_count = parse_count(&form.adult_count, "adultCount", &mut errors);
    let child_count = parse_count(&form.child_count, "childCount", &mut errors);

    if form.facilities.is_empty() {
        errors.push(FieldError::new("facilities", "Facilities must be an array"));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(HotelFields {
        name: name.unwrap(),
        city: city.unwrap(),
        country: country.unwrap(),
        description: description.unwrap(),
        hotel_type: hotel_type.unwrap(),
        price_per_night: price_per_night.unwrap(),
        star_rating: star_rating.unwrap(),
        adult_count: adult_count.unwrap(),
        child_count: child_count.unwrap(),
        facilities: form.facilities.clone(),
    })
}
