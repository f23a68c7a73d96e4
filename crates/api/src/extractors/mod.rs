//! Custom Axum extractors.

pub mod api_key;

#[allow(unused_imports)] // Re-exports for downstream use
pub use api_key::{ApiKeyAuth, OptionalApiKeyAuth};
