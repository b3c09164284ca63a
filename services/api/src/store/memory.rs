//! In-memory storage implementations
//!
//! Used by the integration tests; behavior mirrors the PostgreSQL
//! implementations, including the conditional booking append.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use super::{
    BookingAppend, CatalogStore, CredentialStore, SearchPage, StoreError, StoreResult,
};
use crate::models::{Booking, Hotel, User};
use crate::search::{PAGE_SIZE, SearchFilters, SortOption, sort_hotels};

/// In-memory credential store
#[derive(Default)]
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn insert_user(&self, user: User) -> StoreResult<()> {
        let mut users = self.users.write().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        users.insert(user.id, user);
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.read().unwrap().get(&id).cloned())
    }
}

/// In-memory catalog store
///
/// Hotels are kept in insertion order so unsorted pagination is stable.
#[derive(Default)]
pub struct MemoryCatalogStore {
    hotels: RwLock<Vec<Hotel>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn insert_hotel(&self, hotel: Hotel) -> StoreResult<()> {
        self.hotels.write().unwrap().push(hotel);
        Ok(())
    }

    async fn hotel_by_id(&self, id: Uuid) -> StoreResult<Option<Hotel>> {
        let hotels = self.hotels.read().unwrap();
        Ok(hotels.iter().find(|h| h.id == id).cloned())
    }

    async fn hotels_owned_by(&self, owner_id: Uuid) -> StoreResult<Vec<Hotel>> {
        let hotels = self.hotels.read().unwrap();
        Ok(hotels
            .iter()
            .filter(|h| h.user_id == owner_id)
            .cloned()
            .collect())
    }

    async fn owned_hotel(&self, id: Uuid, owner_id: Uuid) -> StoreResult<Option<Hotel>> {
        let hotels = self.hotels.read().unwrap();
        Ok(hotels
            .iter()
            .find(|h| h.id == id && h.user_id == owner_id)
            .cloned())
    }

    async fn update_owned_hotel(&self, updated: Hotel) -> StoreResult<Option<Hotel>> {
        let mut hotels = self.hotels.write().unwrap();
        match hotels
            .iter_mut()
            .find(|h| h.id == updated.id && h.user_id == updated.user_id)
        {
            Some(stored) => {
                // Attribute replacement only; bookings stay as stored
                let bookings = std::mem::take(&mut stored.bookings);
                *stored = updated;
                stored.bookings = bookings;
                Ok(Some(stored.clone()))
            }
            None => Ok(None),
        }
    }

    async fn search(
        &self,
        filters: &SearchFilters,
        sort: SortOption,
        page: u32,
    ) -> StoreResult<SearchPage> {
        let hotels = self.hotels.read().unwrap();
        let mut matched: Vec<Hotel> = hotels.iter().filter(|h| filters.matches(h)).cloned().collect();
        let total = matched.len() as u64;

        sort_hotels(&mut matched, sort);

        let skip = (page.saturating_sub(1) as usize) * PAGE_SIZE as usize;
        let page_hotels = matched
            .into_iter()
            .skip(skip)
            .take(PAGE_SIZE as usize)
            .collect();

        Ok(SearchPage {
            hotels: page_hotels,
            total,
        })
    }

    async fn append_booking(&self, hotel_id: Uuid, booking: Booking) -> StoreResult<BookingAppend> {
        // Single locked mutation: the duplicate check and the push cannot
        // interleave with another confirmation
        let mut hotels = self.hotels.write().unwrap();
        let Some(hotel) = hotels.iter_mut().find(|h| h.id == hotel_id) else {
            return Ok(BookingAppend::HotelMissing);
        };

        if hotel
            .bookings
            .iter()
            .any(|b| b.payment_intent_id == booking.payment_intent_id)
        {
            return Ok(BookingAppend::AlreadyRecorded);
        }

        hotel.bookings.push(booking);
        Ok(BookingAppend::Appended)
    }

    async fn hotels_booked_by(&self, user_id: Uuid) -> StoreResult<Vec<Hotel>> {
        let hotels = self.hotels.read().unwrap();
        Ok(hotels
            .iter()
            .filter(|h| h.bookings.iter().any(|b| b.user_id == user_id))
            .map(|h| {
                let mut hotel = h.clone();
                hotel.bookings.retain(|b| b.user_id == user_id);
                hotel
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Tester".to_string(),
        }
    }

    fn hotel(owner: Uuid, price: i64) -> Hotel {
        Hotel {
            id: Uuid::new_v4(),
            user_id: owner,
            name: "Test Hotel".to_string(),
            city: "Paris".to_string(),
            country: "France".to_string(),
            description: String::new(),
            hotel_type: "Hotel".to_string(),
            price_per_night: price,
            star_rating: 3,
            adult_count: 2,
            child_count: 0,
            facilities: vec!["wifi".to_string()],
            image_urls: vec![],
            last_updated: Utc::now(),
            bookings: vec![],
        }
    }

    fn booking(user_id: Uuid, intent: &str) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            user_id,
            first_name: "Alice".to_string(),
            last_name: "Tester".to_string(),
            email: "alice@test.com".to_string(),
            adult_count: 2,
            child_count: 0,
            check_in: Utc::now(),
            check_out: Utc::now(),
            total_cost: 150,
            payment_intent_id: intent.to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryCredentialStore::new();
        store.insert_user(user("alice@test.com")).await.unwrap();

        let result = store.insert_user(user("alice@test.com")).await;
        assert!(matches!(result, Err(StoreError::DuplicateEmail)));

        // The first record is untouched
        assert!(store.find_by_email("alice@test.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_booking_append_deduplicates_by_transaction() {
        let store = MemoryCatalogStore::new();
        let h = hotel(Uuid::new_v4(), 100);
        let hotel_id = h.id;
        store.insert_hotel(h).await.unwrap();

        let guest = Uuid::new_v4();
        let first = store
            .append_booking(hotel_id, booking(guest, "pi_1"))
            .await
            .unwrap();
        assert_eq!(first, BookingAppend::Appended);

        let second = store
            .append_booking(hotel_id, booking(guest, "pi_1"))
            .await
            .unwrap();
        assert_eq!(second, BookingAppend::AlreadyRecorded);

        let stored = store.hotel_by_id(hotel_id).await.unwrap().unwrap();
        assert_eq!(stored.bookings.len(), 1);
    }

    #[tokio::test]
    async fn test_booking_append_missing_hotel() {
        let store = MemoryCatalogStore::new();
        let result = store
            .append_booking(Uuid::new_v4(), booking(Uuid::new_v4(), "pi_1"))
            .await
            .unwrap();
        assert_eq!(result, BookingAppend::HotelMissing);
    }

    #[tokio::test]
    async fn test_search_pagination_over_twelve_hotels() {
        let store = MemoryCatalogStore::new();
        let owner = Uuid::new_v4();
        for i in 0..12 {
            store.insert_hotel(hotel(owner, 50 + i)).await.unwrap();
        }

        let filters = SearchFilters::default();
        let page1 = store.search(&filters, SortOption::Unsorted, 1).await.unwrap();
        assert_eq!(page1.hotels.len(), 5);
        assert_eq!(page1.total, 12);

        let page3 = store.search(&filters, SortOption::Unsorted, 3).await.unwrap();
        assert_eq!(page3.hotels.len(), 2);

        // Past the last page: empty, not an error
        let page4 = store.search(&filters, SortOption::Unsorted, 4).await.unwrap();
        assert!(page4.hotels.is_empty());
        assert_eq!(page4.total, 12);
    }

    #[tokio::test]
    async fn test_update_preserves_bookings() {
        let store = MemoryCatalogStore::new();
        let owner = Uuid::new_v4();
        let h = hotel(owner, 100);
        let hotel_id = h.id;
        store.insert_hotel(h.clone()).await.unwrap();
        store
            .append_booking(hotel_id, booking(Uuid::new_v4(), "pi_1"))
            .await
            .unwrap();

        let mut updated = h;
        updated.name = "Renamed".to_string();
        updated.bookings = vec![]; // callers never control bookings via update

        let stored = store.update_owned_hotel(updated).await.unwrap().unwrap();
        assert_eq!(stored.name, "Renamed");
        assert_eq!(stored.bookings.len(), 1);
    }

    #[tokio::test]
    async fn test_owned_hotel_requires_matching_owner() {
        let store = MemoryCatalogStore::new();
        let owner = Uuid::new_v4();
        let h = hotel(owner, 100);
        let hotel_id = h.id;
        store.insert_hotel(h).await.unwrap();

        assert!(store.owned_hotel(hotel_id, owner).await.unwrap().is_some());
        assert!(
            store
                .owned_hotel(hotel_id, Uuid::new_v4())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_hotels_booked_by_narrows_booking_lists() {
        let store = MemoryCatalogStore::new();
        let h = hotel(Uuid::new_v4(), 100);
        let hotel_id = h.id;
        store.insert_hotel(h).await.unwrap();

        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        store.append_booking(hotel_id, booking(alice, "pi_a")).await.unwrap();
        store.append_booking(hotel_id, booking(bob, "pi_b")).await.unwrap();

        let mine = store.hotels_booked_by(alice).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].bookings.len(), 1);
        assert_eq!(mine[0].bookings[0].user_id, alice);

        assert!(store.hotels_booked_by(Uuid::new_v4()).await.unwrap().is_empty());
    }
}
