// src/ingest/providers/mod.rs
pub mod kaggle;
