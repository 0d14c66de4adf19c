// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod config;
pub mod ingest;
pub mod metrics;
pub mod opportunity;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::ingest::types::{IngestReport, SourceProvider};
pub use crate::opportunity::Opportunity;

use crate::ingest::providers::kaggle::KaggleProvider;

/// Every source adapter this build knows about.
pub fn default_providers() -> Vec<Box<dyn SourceProvider>> {
    vec![Box::new(KaggleProvider::synthetic())]
}

/// Names of the providers returned by [`default_providers`].
pub fn known_sources() -> Vec<&'static str> {
    default_providers().iter().map(|p| p.name()).collect()
}
