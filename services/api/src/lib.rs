//! Hotel booking REST backend
//!
//! Library surface of the service so integration tests can assemble the
//! router against in-memory stores and mock providers.

pub mod config;
pub mod error;
pub mod images;
pub mod middleware;
pub mod models;
pub mod password;
pub mod payment;
pub mod routes;
pub mod search;
pub mod state;
pub mod store;
pub mod token;
pub mod validation;
