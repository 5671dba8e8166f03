//! Inference Layer
//!
//! Prompt construction and the chat-completion client.
//!
//! ## Modules
//!
//! - `prompt`: deterministic system+user message pairs per task type
//! - `provider`: the `InferenceProvider` trait and the Together API client

pub mod prompt;
pub mod provider;

pub use prompt::{
    ChatPrompt, build_analysis_prompt, build_correction_prompt, build_paragraph_prompt,
};
pub use provider::{
    CompletionRequest, InferenceProvider, SamplingParams, SharedProvider, TogetherProvider,
};
