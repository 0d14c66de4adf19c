// src/ingest/mod.rs
pub mod config;
pub mod providers;
pub mod raw;
pub mod types;

use crate::ingest::raw::RawRecord;
use crate::ingest::types::{IngestReport, SourceProvider};
use crate::opportunity::Opportunity;
use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::collections::HashSet;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "ingest_records_total",
            "Raw records fetched from providers."
        );
        describe_counter!(
            "ingest_kept_total",
            "Opportunities kept after normalization + dedup."
        );
        describe_counter!(
            "ingest_skipped_total",
            "Raw records dropped because normalization failed."
        );
        describe_counter!(
            "ingest_dedup_total",
            "Opportunities removed as cross-source URL duplicates."
        );
        describe_counter!(
            "ingest_provider_errors_total",
            "Provider fetch/parse errors."
        );
        describe_histogram!(
            "ingest_normalize_ms",
            "Per-provider normalization time in milliseconds."
        );
        describe_gauge!(
            "ingest_pipeline_last_run_ts",
            "Unix ts when ingest pipeline last ran."
        );
    });
}

pub fn is_enabled<S: AsRef<str>>(source: S, enabled: &[String]) -> bool {
    let s = source.as_ref();
    enabled.is_empty() || enabled.iter().any(|w| w.eq_ignore_ascii_case(s))
}

/// Normalize every raw record of one provider.
///
/// A record that fails is logged and dropped; the rest continue.
/// Returns (opportunities, skipped_count).
pub fn normalize_batch(
    provider: &dyn SourceProvider,
    raw: Vec<Value>,
    now: DateTime<Utc>,
) -> (Vec<Opportunity>, usize) {
    let t0 = std::time::Instant::now();
    let mut out = Vec::with_capacity(raw.len());
    let mut skipped = 0usize;

    for (index, value) in raw.into_iter().enumerate() {
        let parsed = RawRecord::from_value(value).and_then(|rec| provider.normalize(&rec, now));
        match parsed {
            Ok(opp) => out.push(opp),
            Err(e) => {
                skipped += 1;
                tracing::warn!(
                    target: "ingest",
                    source = provider.name(),
                    index,
                    error = %e,
                    "failed to normalize record"
                );
            }
        }
    }

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("ingest_normalize_ms").record(ms);

    (out, skipped)
}

/// Drop opportunities whose URL was already seen. First occurrence wins.
pub fn dedup_by_url(items: Vec<Opportunity>) -> (Vec<Opportunity>, usize) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut keep = Vec::with_capacity(items.len());
    let mut dup = 0usize;

    for opp in items {
        if !seen.insert(opp.url.clone()) {
            dup += 1;
            continue;
        }
        keep.push(opp);
    }

    (keep, dup)
}

/// Run one collection pass over `providers`.
///
/// Providers outside `enabled` (empty = all) are not called. A provider that
/// fails to fetch contributes nothing; the pass itself never fails.
pub async fn run_once(
    providers: &[Box<dyn SourceProvider>],
    enabled: &[String],
    now: DateTime<Utc>,
) -> IngestReport {
    ensure_metrics_described();

    let mut report = IngestReport::default();
    let mut collected = Vec::new();

    for p in providers {
        if !is_enabled(p.name(), enabled) {
            tracing::debug!(target: "ingest", source = p.name(), "source disabled");
            continue;
        }
        tracing::info!(target: "ingest", source = p.name(), "starting scrape");

        match p.fetch_raw(now).await {
            Ok(raw) => {
                let (mut opps, skipped) = normalize_batch(p.as_ref(), raw, now);
                tracing::info!(
                    target: "ingest",
                    source = p.name(),
                    count = opps.len(),
                    skipped,
                    "scrape complete"
                );
                report.skipped += skipped;
                collected.append(&mut opps);
            }
            Err(e) => {
                tracing::error!(target: "ingest", error = ?e, source = p.name(), "scrape failed");
                counter!("ingest_provider_errors_total").increment(1);
                report.provider_errors += 1;
            }
        }
    }

    let (kept, dup) = dedup_by_url(collected);
    report.duplicates = dup;
    report.opportunities = kept;

    // Telemetry
    counter!("ingest_kept_total").increment(report.opportunities.len() as u64);
    counter!("ingest_skipped_total").increment(report.skipped as u64);
    counter!("ingest_dedup_total").increment(report.duplicates as u64);
    gauge!("ingest_pipeline_last_run_ts").set(now.timestamp().max(0) as f64);

    report
}
