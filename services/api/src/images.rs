//! Image bridge
//!
//! Uploaded hotel photos are pushed to an external asset host; only the
//! returned public URLs are persisted. Bytes travel as a base64 data URI.

use anyhow::Result;
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Deserialize;

/// Integration boundary with the external asset host
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload raw image bytes; returns the hosted public URL
    async fn upload(&self, bytes: &[u8], content_type: &str) -> Result<String>;
}

/// Encode image bytes as a `data:` URI for transport
pub fn data_uri(bytes: &[u8], content_type: &str) -> String {
    format!("data:{};base64,{}", content_type, STANDARD.encode(bytes))
}

/// REST asset host speaking the data-URI upload contract
pub struct HttpImageHost {
    client: reqwest::Client,
    upload_url: String,
    api_key: String,
}

impl HttpImageHost {
    pub fn new(upload_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            upload_url,
            api_key,
        }
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    url: String,
}

#[async_trait]
impl ImageHost for HttpImageHost {
    async fn upload(&self, bytes: &[u8], content_type: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.upload_url)
            .header("X-Api-Key", &self.api_key)
            .json(&serde_json::json!({ "file": data_uri(bytes, content_type) }))
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("asset host rejected upload: {}", response.status());
        }

        let uploaded = response.json::<UploadResponse>().await?;
        Ok(uploaded.url)
    }
}
