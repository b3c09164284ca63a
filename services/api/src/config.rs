//! Service configuration from environment variables

use anyhow::Result;
use std::env;

/// Booking API configuration
///
/// # Environment Variables
/// - `PORT`: listen port (default: 7000)
/// - `JWT_SECRET_KEY`: shared secret signing session tokens
/// - `FRONTEND_URL`: origin allowed to call the API cross-origin
/// - `APP_ENV`: session cookies are marked `Secure` when `production`
/// - `STRIPE_SECRET_KEY`: payment provider secret key
/// - `STRIPE_API_BASE`: payment provider endpoint (default: the live API)
/// - `ASSET_HOST_UPLOAD_URL`: asset host image upload endpoint
/// - `ASSET_HOST_API_KEY`: asset host credential
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub jwt_secret: String,
    pub frontend_origin: Option<String>,
    pub cookie_secure: bool,
    pub stripe_secret_key: String,
    pub stripe_api_base: String,
    pub asset_upload_url: String,
    pub asset_api_key: String,
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(7000);

        let jwt_secret = env::var("JWT_SECRET_KEY")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET_KEY environment variable not set"))?;

        let frontend_origin = env::var("FRONTEND_URL").ok().filter(|s| !s.is_empty());

        let cookie_secure = env::var("APP_ENV")
            .map(|e| e == "production")
            .unwrap_or(false);

        let stripe_secret_key = env::var("STRIPE_SECRET_KEY")
            .map_err(|_| anyhow::anyhow!("STRIPE_SECRET_KEY environment variable not set"))?;

        let stripe_api_base = env::var("STRIPE_API_BASE")
            .unwrap_or_else(|_| "https://api.stripe.com".to_string());

        let asset_upload_url = env::var("ASSET_HOST_UPLOAD_URL")
            .map_err(|_| anyhow::anyhow!("ASSET_HOST_UPLOAD_URL environment variable not set"))?;

        let asset_api_key = env::var("ASSET_HOST_API_KEY")
            .map_err(|_| anyhow::anyhow!("ASSET_HOST_API_KEY environment variable not set"))?;

        Ok(AppConfig {
            port,
            jwt_secret,
            frontend_origin,
            cookie_secure,
            stripe_secret_key,
            stripe_api_base,
            asset_upload_url,
            asset_api_key,
        })
    }
}
