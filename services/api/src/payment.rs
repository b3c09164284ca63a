//! Payment bridge
//!
//! Bookings are paid through an external provider speaking the
//! payment-intent model: the server creates an intent for the computed
//! total, the client completes it out of band with the returned secret,
//! and confirmation retrieves the intent to check its status and
//! metadata before anything is written.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Provider status value for a completed payment
pub const STATUS_SUCCEEDED: &str = "succeeded";

/// Tags stamped onto a transaction at creation; confirmation requires
/// them to match the requesting hotel and user exactly
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentMetadata {
    #[serde(rename = "hotelId")]
    pub hotel_id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

impl PaymentMetadata {
    pub fn new(hotel_id: Uuid, user_id: Uuid) -> Self {
        Self {
            hotel_id: hotel_id.to_string(),
            user_id: user_id.to_string(),
        }
    }
}

/// A payment transaction as reported by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
    /// Amount in minor currency units
    pub amount: i64,
    pub status: String,
    pub metadata: PaymentMetadata,
}

/// Integration boundary with the external payment processor
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a transaction for `amount` minor units, tagged with the
    /// hotel/user metadata
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
        metadata: PaymentMetadata,
    ) -> Result<PaymentIntent>;

    /// Retrieve a transaction by handle; `None` when the handle does not
    /// resolve with the provider
    async fn retrieve_intent(&self, id: &str) -> Result<Option<PaymentIntent>>;
}

/// Stripe-shaped REST provider
pub struct StripeProvider {
    client: reqwest::Client,
    secret_key: String,
    api_base: String,
}

impl StripeProvider {
    pub fn new(secret_key: String, api_base: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key,
            api_base,
        }
    }
}

#[async_trait]
impl PaymentProvider for StripeProvider {
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
        metadata: PaymentMetadata,
    ) -> Result<PaymentIntent> {
        let params = [
            ("amount", amount.to_string()),
            ("currency", currency.to_string()),
            ("metadata[hotelId]", metadata.hotel_id),
            ("metadata[userId]", metadata.user_id),
        ];

        let response = self
            .client
            .post(format!("{}/v1/payment_intents", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!(
                "payment provider rejected intent creation: {}",
                response.status()
            );
        }

        let intent = response.json::<PaymentIntent>().await?;
        Ok(intent)
    }

    async fn retrieve_intent(&self, id: &str) -> Result<Option<PaymentIntent>> {
        let response = self
            .client
            .get(format!("{}/v1/payment_intents/{}", self.api_base, id))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            anyhow::bail!(
                "payment provider lookup failed: {}",
                response.status()
            );
        }

        let intent = response.json::<PaymentIntent>().await?;
        Ok(Some(intent))
    }
}
