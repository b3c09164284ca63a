//! API models for stored records and wire payloads

pub mod hotel;
pub mod user;

pub use hotel::{
    Booking, BookingRequest, Hotel, HotelForm, HotelSearchResponse, Pagination, QuoteRequest,
    QuoteResponse,
};
pub use user::{LoginRequest, LoginResponse, RegisterRequest, User, UserProfile};
