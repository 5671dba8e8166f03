//! Tintero - Literary Analysis and Style Correction Pipeline
//!
//! A payment-gated, two-stage text-processing pipeline: user-submitted text
//! is analyzed by a hosted LLM, corrected with inline bracket-delimited
//! justifications, parsed into (span, justification) segments, and exported
//! as a word-processing document.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use tintero::{ConfigLoader, DocumentExporter, Pipeline, TogetherProvider};
//! use tintero::pipeline::{AccessContext, NullObserver};
//!
//! let config = ConfigLoader::load()?;
//! let provider = Arc::new(TogetherProvider::new(&config.inference)?);
//! let exporter = DocumentExporter::new(config.export.title.clone());
//! let pipeline = Pipeline::new(provider, None, exporter, config.pipeline.clone())?;
//! let output = pipeline.run(&submission, &AccessContext::default(), &NullObserver).await?;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: prompt construction and the chat-completion client
//! - [`correction`]: bracket-justification parsing of correction output
//! - [`payment`]: checkout sessions, signed tokens, fail-closed verification
//! - [`export`]: docx rendering
//! - [`pipeline`]: the orchestrator sequencing every stage
//! - [`config`]: layered configuration with environment overrides

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod correction;
pub mod export;
pub mod payment;
pub mod pipeline;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, CorrectionPolicy, GateMode};

// Error Types
pub use types::error::{Result, TinteroError, ValidationError};

// Domain Types
pub use types::{AnalysisResult, Genre, Language, SessionId, TextSubmission, word_count};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use pipeline::{AccessContext, Pipeline, PipelineOutput, StageObserver};

// =============================================================================
// Component Re-exports
// =============================================================================

pub use ai::{InferenceProvider, SharedProvider, TogetherProvider};
pub use correction::{CorrectionParser, CorrectionResult, CorrectionSegment};
pub use export::DocumentExporter;
pub use payment::{PaymentCredential, PaymentGate, TokenSigner};
