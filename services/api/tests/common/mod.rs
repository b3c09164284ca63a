//! Shared test fixtures: in-memory server, mock payment provider and
//! mock image host

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use api::models::Hotel;
use api::payment::{PaymentIntent, PaymentMetadata, PaymentProvider};
use api::images::ImageHost;
use api::routes::create_router;
use api::state::AppState;
use api::store::{CatalogStore, CredentialStore, MemoryCatalogStore, MemoryCredentialStore};
use api::token::TokenService;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Payment provider backed by a map of transactions
///
/// Freshly created transactions start unconfirmed; tests flip them to
/// `succeeded` to simulate the client completing payment out of band.
pub struct MockPaymentProvider {
    intents: Mutex<HashMap<String, PaymentIntent>>,
    counter: AtomicU64,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self {
            intents: Mutex::new(HashMap::new()),
            counter: AtomicU64::new(0),
        }
    }

    /// Simulate the client completing payment for a transaction
    pub fn mark_succeeded(&self, id: &str) {
        let mut intents = self.intents.lock().unwrap();
        if let Some(intent) = intents.get_mut(id) {
            intent.status = "succeeded".to_string();
        }
    }

    /// Force a transaction into an arbitrary provider status
    pub fn set_status(&self, id: &str, status: &str) {
        let mut intents = self.intents.lock().unwrap();
        if let Some(intent) = intents.get_mut(id) {
            intent.status = status.to_string();
        }
    }

    pub fn intent(&self, id: &str) -> Option<PaymentIntent> {
        self.intents.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_intent(
        &self,
        amount: i64,
        _currency: &str,
        metadata: PaymentMetadata,
    ) -> Result<PaymentIntent> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let id = format!("pi_test_{}", n);
        let intent = PaymentIntent {
            client_secret: Some(format!("{}_secret", id)),
            id: id.clone(),
            amount,
            status: "requires_payment_method".to_string(),
            metadata,
        };
        self.intents.lock().unwrap().insert(id, intent.clone());
        Ok(intent)
    }

    async fn retrieve_intent(&self, id: &str) -> Result<Option<PaymentIntent>> {
        Ok(self.intents.lock().unwrap().get(id).cloned())
    }
}

/// Image host that hands out sequential fake URLs
pub struct MockImageHost {
    uploads: Mutex<Vec<String>>,
    counter: AtomicU64,
}

impl MockImageHost {
    pub fn new() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            counter: AtomicU64::new(0),
        }
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageHost for MockImageHost {
    async fn upload(&self, _bytes: &[u8], _content_type: &str) -> Result<String> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let url = format!("https://images.test/{}.png", n);
        self.uploads.lock().unwrap().push(url.clone());
        Ok(url)
    }
}

/// A running test server plus handles to its stores and mocks
pub struct TestApp {
    pub server: TestServer,
    pub credentials: Arc<MemoryCredentialStore>,
    pub catalog: Arc<MemoryCatalogStore>,
    pub payments: Arc<MockPaymentProvider>,
    pub images: Arc<MockImageHost>,
    pub tokens: TokenService,
}

/// Create a test server wired to in-memory stores and mock providers
pub fn spawn_app() -> TestApp {
    let credentials = Arc::new(MemoryCredentialStore::new());
    let catalog = Arc::new(MemoryCatalogStore::new());
    let payments = Arc::new(MockPaymentProvider::new());
    let images = Arc::new(MockImageHost::new());
    let tokens = TokenService::new(TEST_SECRET);

    let state = AppState {
        credentials: credentials.clone(),
        catalog: catalog.clone(),
        payments: payments.clone(),
        images: images.clone(),
        tokens: tokens.clone(),
        cookie_secure: false,
    };

    let mut server = TestServer::new(create_router(state)).expect("Failed to create test server");
    server.save_cookies();

    TestApp {
        server,
        credentials,
        catalog,
        payments,
        images,
        tokens,
    }
}

/// Register a user through the API and return its id; leaves the
/// session cookie saved on the server
pub async fn register_user(app: &TestApp, email: &str) -> Uuid {
    let response = app
        .server
        .post("/api/users/register")
        .json(&json!({
            "email": email,
            "password": "secret1",
            "firstName": "Alice",
            "lastName": "Tester",
        }))
        .await;
    response.assert_status_ok();

    app.credentials
        .find_by_email(email)
        .await
        .unwrap()
        .expect("registered user should exist")
        .id
}

/// Insert a hotel directly into the catalog
pub async fn seed_hotel(app: &TestApp, owner: Uuid, city: &str, price_per_night: i64) -> Hotel {
    let hotel = Hotel {
        id: Uuid::new_v4(),
        user_id: owner,
        name: format!("{} Grand", city),
        city: city.to_string(),
        country: "France".to_string(),
        description: "Quiet rooms".to_string(),
        hotel_type: "Boutique".to_string(),
        price_per_night,
        star_rating: 3,
        adult_count: 2,
        child_count: 1,
        facilities: vec!["Free WiFi".to_string()],
        image_urls: vec![],
        last_updated: Utc::now(),
        bookings: vec![],
    };

    app.catalog.insert_hotel(hotel.clone()).await.unwrap();
    hotel
}

/// A well-formed booking confirmation body for the given transaction
pub fn booking_body(payment_intent_id: &str) -> serde_json::Value {
    let check_in = Utc::now() + Duration::days(7);
    json!({
        "paymentIntentId": payment_intent_id,
        "firstName": "Alice",
        "lastName": "Tester",
        "email": "alice@test.com",
        "adultCount": 2,
        "childCount": 0,
        "checkIn": check_in,
        "checkOut": check_in + Duration::days(3),
    })
}
