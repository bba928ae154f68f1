//! Orchestration layer for the Newsdesk topic retriever
//!
//! This crate drives one interactive run: build (or reuse) topic vectors
//! from the labeled set, then run each registered source's fetch → index →
//! query pass in isolation and aggregate the per-source result tables.

pub mod pipeline;

pub use pipeline::{PipelineConfig, RetrievalPipeline, SourcePassError};
