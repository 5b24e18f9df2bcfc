//! Shared state for the API layer.

use std::sync::Arc;

use crate::pipeline::llm::LlmGenerate;
use crate::pipeline::rag::types::EvidenceSearch;
use crate::pipeline::textsource::TextSource;
use crate::pricing::PriceTable;

/// Read-only context shared by every route.
///
/// Everything here is constructed once at process start and only ever read
/// afterwards, so concurrent requests need no coordination.
#[derive(Clone)]
pub struct ApiContext {
    pub prices: Arc<PriceTable>,
    pub text_source: Arc<dyn TextSource>,
    pub evidence: Arc<dyn EvidenceSearch>,
    pub llm: Arc<dyn LlmGenerate>,
}

impl ApiContext {
    pub fn new(
        prices: Arc<PriceTable>,
        text_source: Arc<dyn TextSource>,
        evidence: Arc<dyn EvidenceSearch>,
        llm: Arc<dyn LlmGenerate>,
    ) -> Self {
        Self {
            prices,
            text_source,
            evidence,
            llm,
        }
    }
}
