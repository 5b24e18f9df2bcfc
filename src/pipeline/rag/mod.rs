//! Retrieval-augmented grounding for explanations and appeals.
//!
//! The vector store itself is an external collaborator behind the
//! `EvidenceSearch` trait: query text in, scored passages out. This module
//! owns query construction, score handling, evidence formatting, and the
//! prompts that consume the evidence.

pub mod context;
pub mod prompt;
pub mod retrieval;
pub mod types;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RagError {
    #[error("Evidence backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Evidence search failed: {0}")]
    SearchFailed(String),
}
