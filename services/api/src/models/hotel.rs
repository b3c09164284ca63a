//! Hotel listings and their embedded bookings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Booking embedded in a hotel record
///
/// A booking exists only once the payment provider reported its
/// transaction as succeeded; `payment_intent_id` is the transaction
/// handle and doubles as the idempotency key for the append.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub adult_count: i32,
    pub child_count: i32,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    /// Derived from the confirmed transaction amount, never client input
    pub total_cost: i64,
    pub payment_intent_id: String,
}

/// Hotel listing owned by exactly one user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: Uuid,
    /// Identifier of the owning user; ownership checks compare this
    /// against the authenticated caller
    pub user_id: Uuid,
    pub name: String,
    pub city: String,
    pub country: String,
    pub description: String,
    #[serde(rename = "type")]
    pub hotel_type: String,
    pub price_per_night: i64,
    pub star_rating: i32,
    pub adult_count: i32,
    pub child_count: i32,
    pub facilities: Vec<String>,
    pub image_urls: Vec<String>,
    pub last_updated: DateTime<Utc>,
    pub bookings: Vec<Booking>,
}

/// Text fields collected from the multipart create/update forms,
/// prior to validation
#[derive(Debug, Default, Clone)]
pub struct HotelForm {
    pub name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
    pub hotel_type: Option<String>,
    pub price_per_night: Option<String>,
    pub star_rating: Option<String>,
    pub adult_count: Option<String>,
    pub child_count: Option<String>,
    pub facilities: Vec<String>,
    /// URLs retained from the existing record on update
    pub image_urls: Vec<String>,
}

/// Pagination envelope for search results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub pages: u32,
}

/// Response for hotel search
#[derive(Debug, Serialize)]
pub struct HotelSearchResponse {
    pub data: Vec<Hotel>,
    pub pagination: Pagination,
}

/// Request for a booking quote (payment-intent creation)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub number_of_nights: Option<i64>,
}

/// Response for a booking quote
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub payment_intent_id: String,
    pub client_secret: String,
    pub total_cost: i64,
}

/// Request to confirm a booking against a payment transaction
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    #[serde(default)]
    pub payment_intent_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub adult_count: i32,
    #[serde(default)]
    pub child_count: i32,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hotel_wire_shape_is_camel_case() {
        let hotel = Hotel {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Harbour View".to_string(),
            city: "Lisbon".to_string(),
            country: "Portugal".to_string(),
            description: "Quiet rooms near the water".to_string(),
            hotel_type: "Boutique".to_string(),
            price_per_night: 120,
            star_rating: 4,
            adult_count: 2,
            child_count: 1,
            facilities: vec!["Free WiFi".to_string()],
            image_urls: vec![],
            last_updated: Utc::now(),
            bookings: vec![],
        };

        let value = serde_json::to_value(&hotel).unwrap();
        assert!(value.get("pricePerNight").is_some());
        assert!(value.get("starRating").is_some());
        assert_eq!(value.get("type").unwrap(), "Boutique");
        assert!(value.get("price_per_night").is_none());
    }
}
