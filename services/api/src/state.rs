//! Application state shared across handlers

use std::sync::Arc;

use crate::images::ImageHost;
use crate::payment::PaymentProvider;
use crate::store::{CatalogStore, CredentialStore};
use crate::token::TokenService;

/// Application state shared across handlers
///
/// Stores and provider bridges sit behind trait objects so production
/// (PostgreSQL, real providers) and tests (in-memory, mocks) wire the
/// same router.
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<dyn CredentialStore>,
    pub catalog: Arc<dyn CatalogStore>,
    pub payments: Arc<dyn PaymentProvider>,
    pub images: Arc<dyn ImageHost>,
    pub tokens: TokenService,
    /// Whether session cookies carry the `Secure` attribute
    pub cookie_secure: bool,
}
