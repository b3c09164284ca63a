//! Storage abstractions for the booking platform
//!
//! The credential store holds user records; the catalog store holds
//! hotels with their embedded bookings. Production runs on PostgreSQL;
//! tests run on the in-memory implementations.

pub mod memory;
pub mod postgres;

pub use memory::{MemoryCatalogStore, MemoryCredentialStore};
pub use postgres::{PgCatalogStore, PgCredentialStore, ensure_schema};

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Booking, Hotel, User};
use crate::search::{SearchFilters, SortOption};

/// Errors surfaced by store implementations
#[derive(Error, Debug)]
pub enum StoreError {
    /// An insert collided with an existing email
    #[error("email already registered")]
    DuplicateEmail,

    /// Underlying database failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// A stored document could not be decoded
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl From<StoreError> for crate::error::ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => {
                crate::error::ApiError::Conflict("User already exists".to_string())
            }
            other => crate::error::ApiError::Upstream(anyhow::Error::new(other)),
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// One page of search results plus the total match count
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub hotels: Vec<Hotel>,
    pub total: u64,
}

/// Outcome of a conditional booking append
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAppend {
    /// The booking was recorded
    Appended,
    /// A booking for this payment transaction already exists
    AlreadyRecorded,
    /// No hotel with the given id
    HotelMissing,
}

/// Persisted user records keyed by id and unique email
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new user; fails with [`StoreError::DuplicateEmail`] when
    /// the email already has a record
    async fn insert_user(&self, user: User) -> StoreResult<()>;

    /// Look a user up by exact email
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Look a user up by id
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
}

/// Persisted hotel records with embedded bookings
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert_hotel(&self, hotel: Hotel) -> StoreResult<()>;

    async fn hotel_by_id(&self, id: Uuid) -> StoreResult<Option<Hotel>>;

    /// All hotels owned by a user
    async fn hotels_owned_by(&self, owner_id: Uuid) -> StoreResult<Vec<Hotel>>;

    /// A single hotel, only if owned by the given user
    async fn owned_hotel(&self, id: Uuid, owner_id: Uuid) -> StoreResult<Option<Hotel>>;

    /// Replace an owned hotel's attributes; the stored booking list is
    /// never touched by updates. Returns the stored record, or `None`
    /// when no hotel matches the id/owner pair.
    async fn update_owned_hotel(&self, hotel: Hotel) -> StoreResult<Option<Hotel>>;

    /// Filtered, sorted, fixed-size page of hotels (1-based page number)
    async fn search(
        &self,
        filters: &SearchFilters,
        sort: SortOption,
        page: u32,
    ) -> StoreResult<SearchPage>;

    /// Append a booking unless one is already recorded for the same
    /// payment transaction. The check and the append are a single atomic
    /// store operation, so concurrent confirmations of one transaction
    /// cannot double-book.
    async fn append_booking(&self, hotel_id: Uuid, booking: Booking) -> StoreResult<BookingAppend>;

    /// Hotels containing at least one booking by the given user, with
    /// each booking list narrowed to that user's bookings
    async fn hotels_booked_by(&self, user_id: Uuid) -> StoreResult<Vec<Hotel>>;
}
