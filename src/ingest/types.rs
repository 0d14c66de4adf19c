// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::ingest::raw::RawRecord;
use crate::opportunity::Opportunity;

/// A source adapter: fetches raw listings and maps each one into the
/// canonical schema.
#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    /// Raw listings as the source delivers them. Elements need not be objects.
    /// `now` is the time of the collection pass.
    async fn fetch_raw(&self, now: DateTime<Utc>) -> Result<Vec<Value>>;

    /// Map one raw record. Must not panic; an `Err` skips only this record.
    fn normalize(&self, raw: &RawRecord, now: DateTime<Utc>) -> Result<Opportunity>;

    fn name(&self) -> &'static str;
}

/// Outcome of one collection pass across all providers.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub opportunities: Vec<Opportunity>,
    pub skipped: usize,
    pub duplicates: usize,
    pub provider_errors: usize,
}
