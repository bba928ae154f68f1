//! Core types for the Newsdesk topic retriever
//!
//! This crate defines the shared data structures used across the retriever,
//! including labeled example sets, normalized documents, and match results.

pub mod document;
pub mod labeled;
pub mod matching;

pub use document::Document;
pub use labeled::{CategoryExamples, LabeledExample, LabeledSet};
pub use matching::{MatchResult, RunReport, SourceTable};
