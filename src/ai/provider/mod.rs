//! Inference Provider Abstraction
//!
//! Defines the InferenceProvider trait for single-shot chat completions.
//! Each pipeline stage issues exactly one call; there is no retry, no
//! streaming, and only the first completion choice is consumed.

mod together;

pub use together::TogetherProvider;

use async_trait::async_trait;
use std::sync::Arc;

use crate::constants::sampling;
use crate::types::Result;

// =============================================================================
// Completion Request
// =============================================================================

/// Sampling parameters for one completion call
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub repetition_penalty: f32,
    pub stop: Vec<String>,
}

impl SamplingParams {
    fn with_stage(max_tokens: u32, temperature: f32) -> Self {
        Self {
            max_tokens,
            temperature,
            top_p: sampling::TOP_P,
            top_k: sampling::TOP_K,
            repetition_penalty: sampling::REPETITION_PENALTY,
            stop: vec![sampling::STOP_SEQUENCE.to_string()],
        }
    }

    /// Parameters for the literary analysis stage
    pub fn analysis() -> Self {
        Self::with_stage(
            sampling::analysis::MAX_TOKENS,
            sampling::analysis::TEMPERATURE,
        )
    }

    /// Parameters for the whole-text correction stage
    pub fn correction() -> Self {
        Self::with_stage(
            sampling::correction::MAX_TOKENS,
            sampling::correction::TEMPERATURE,
        )
    }

    /// Parameters for the paragraph-batch correction stage
    pub fn paragraph() -> Self {
        Self::with_stage(
            sampling::paragraph::MAX_TOKENS,
            sampling::paragraph::TEMPERATURE,
        )
    }
}

/// One chat-completion request: a system+user message pair plus sampling
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub params: SamplingParams,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>, params: SamplingParams) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            params,
        }
    }
}

// =============================================================================
// Inference Provider Trait
// =============================================================================

/// Shared provider type for injection into the pipeline
pub type SharedProvider = Arc<dyn InferenceProvider + Send + Sync>;

/// Single-shot chat-completion provider
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Issue one non-streaming completion and return the first choice's
    /// message content.
    async fn complete(&self, request: CompletionRequest) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_params() {
        let analysis = SamplingParams::analysis();
        assert_eq!(analysis.max_tokens, 2000);
        assert_eq!(analysis.temperature, 0.5);

        let correction = SamplingParams::correction();
        assert_eq!(correction.max_tokens, 3000);

        let paragraph = SamplingParams::paragraph();
        assert_eq!(paragraph.max_tokens, 2512);
        assert_eq!(paragraph.temperature, 0.7);

        // Shared across every stage
        for params in [analysis, correction, paragraph] {
            assert_eq!(params.top_p, 0.7);
            assert_eq!(params.top_k, 50);
            assert_eq!(params.repetition_penalty, 1.0);
            assert_eq!(params.stop, vec!["<|eot_id|>".to_string()]);
        }
    }
}
