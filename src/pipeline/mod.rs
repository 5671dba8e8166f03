//! Pipeline Orchestration
//!
//! Sequences the stages: validation → payment gate (when enabled) → analysis
//! call → correction stage → parse → document export. Execution is strictly
//! sequential - the correction prompt depends on the analysis output - and a
//! single user action runs the whole pipeline end-to-end.
//!
//! Stage outputs are pushed to an injected observer as they land, so output
//! already surfaced (e.g. the analysis) stays visible when a later stage
//! fails. No stage is ever retried; a transient upstream failure surfaces
//! immediately and the user may resubmit.

use std::sync::Arc;

use tracing::{info, warn};

use crate::ai::{
    CompletionRequest, SamplingParams, SharedProvider, build_analysis_prompt,
    build_correction_prompt, build_paragraph_prompt,
};
use crate::config::{CorrectionPolicy, GateMode, PipelineConfig};
use crate::correction::{CorrectionParser, CorrectionResult};
use crate::export::DocumentExporter;
use crate::payment::{PaymentCredential, PaymentGate};
use crate::types::{
    AnalysisResult, Result, TextSubmission, TinteroError, ValidationError,
};

// =============================================================================
// Access Context
// =============================================================================

/// Request-scoped access state, derived once per request.
///
/// The credential is the sole source of truth: a fresh load presenting a
/// valid token unlocks access with no server-side state.
#[derive(Debug, Clone, Default)]
pub struct AccessContext {
    pub credential: Option<PaymentCredential>,
    /// The checkout was canceled on redirect
    pub canceled: bool,
}

impl AccessContext {
    pub fn new(credential: Option<PaymentCredential>, canceled: bool) -> Self {
        Self {
            credential,
            canceled,
        }
    }
}

// =============================================================================
// Stage Observer
// =============================================================================

/// Receives stage outputs as they land, ahead of the final result.
pub trait StageObserver: Send + Sync {
    fn on_analysis(&self, _analysis: &AnalysisResult) {}
    fn on_correction(&self, _correction: &CorrectionResult) {}
    fn on_document(&self, _buffer: &[u8]) {}
}

/// Observer that discards stage output
pub struct NullObserver;

impl StageObserver for NullObserver {}

// =============================================================================
// Pipeline
// =============================================================================

/// Full output of one successful pipeline run
#[derive(Debug)]
pub struct PipelineOutput {
    pub analysis: AnalysisResult,
    pub correction: CorrectionResult,
    pub document: Vec<u8>,
}

/// Orchestrates one submission through every stage
pub struct Pipeline {
    provider: SharedProvider,
    gate: Option<Arc<PaymentGate>>,
    parser: CorrectionParser,
    exporter: DocumentExporter,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        provider: SharedProvider,
        gate: Option<Arc<PaymentGate>>,
        exporter: DocumentExporter,
        config: PipelineConfig,
    ) -> Result<Self> {
        if config.gate.is_enabled() && gate.is_none() {
            return Err(TinteroError::Config(
                "payment gating is enabled but no payment gate is configured".to_string(),
            ));
        }

        Ok(Self {
            provider,
            gate,
            parser: CorrectionParser::new(),
            exporter,
            config,
        })
    }

    /// Run the full pipeline for one submission.
    ///
    /// Validation happens before any network call; each later stage's output
    /// reaches the observer before the next stage starts.
    pub async fn run(
        &self,
        submission: &TextSubmission,
        access: &AccessContext,
        observer: &dyn StageObserver,
    ) -> Result<PipelineOutput> {
        self.validate(submission)?;

        if self.config.gate == GateMode::BeforeAnalysis {
            self.require_paid(access).await?;
        }

        let analysis = self.run_analysis(submission).await?;
        observer.on_analysis(&analysis);

        if self.config.gate == GateMode::BeforeExport {
            self.require_paid(access).await?;
        }

        let corrected_text = match self.config.correction {
            CorrectionPolicy::HaltOnError => self.correct_whole(&analysis, submission).await?,
            CorrectionPolicy::ParagraphFallback => self.correct_paragraphs(submission).await?,
        };

        let correction = self.parser.parse(&corrected_text);
        observer.on_correction(&correction);

        let document = self.exporter.render(&analysis, &correction)?;
        observer.on_document(&document);

        info!(
            "Pipeline complete: {} correction segments, {} byte document",
            correction.len(),
            document.len()
        );

        Ok(PipelineOutput {
            analysis,
            correction,
            document,
        })
    }

    // =========================================================================
    // Stages
    // =========================================================================

    /// Reject bad submissions before any network traffic.
    fn validate(&self, submission: &TextSubmission) -> Result<()> {
        if submission.raw_text.trim().is_empty() {
            return Err(ValidationError::empty_text().into());
        }
        if submission.audience.trim().is_empty() {
            return Err(ValidationError::empty_audience().into());
        }

        let count = submission.word_count();
        if count < self.config.min_words || count > self.config.max_words {
            return Err(
                ValidationError::word_count(count, self.config.min_words, self.config.max_words)
                    .into(),
            );
        }

        Ok(())
    }

    /// Deny unless the request's credential verifies as paid.
    async fn require_paid(&self, access: &AccessContext) -> Result<()> {
        let gate = self.gate.as_ref().ok_or_else(|| {
            TinteroError::Config("payment gating is enabled but no gate is configured".to_string())
        })?;

        if access.canceled {
            return Err(TinteroError::PaymentRequired(
                "the checkout was canceled; retry payment to continue".to_string(),
            ));
        }

        let credential = access.credential.as_ref().ok_or_else(|| {
            TinteroError::PaymentRequired("no payment credential was presented".to_string())
        })?;

        if gate.verify(credential).await {
            Ok(())
        } else {
            Err(TinteroError::PaymentRequired(
                "payment could not be verified for the presented credential".to_string(),
            ))
        }
    }

    async fn run_analysis(&self, submission: &TextSubmission) -> Result<AnalysisResult> {
        let prompt = build_analysis_prompt(
            submission.genre,
            &submission.audience,
            submission.language,
            &submission.raw_text,
        );

        let content = self
            .provider
            .complete(CompletionRequest::new(
                prompt.system,
                prompt.user,
                SamplingParams::analysis(),
            ))
            .await?;

        Ok(AnalysisResult::new(content))
    }

    /// Single whole-text correction; any failure halts the run.
    async fn correct_whole(
        &self,
        analysis: &AnalysisResult,
        submission: &TextSubmission,
    ) -> Result<String> {
        let prompt = build_correction_prompt(analysis.content(), &submission.raw_text);

        self.provider
            .complete(CompletionRequest::new(
                prompt.system,
                prompt.user,
                SamplingParams::correction(),
            ))
            .await
    }

    /// Paragraph-batch correction: a failed call re-emits the original
    /// paragraph unchanged rather than losing it. Fatal errors still halt.
    async fn correct_paragraphs(&self, submission: &TextSubmission) -> Result<String> {
        let paragraphs: Vec<&str> = submission
            .raw_text
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        let mut corrected = Vec::with_capacity(paragraphs.len());

        for paragraph in paragraphs {
            let prompt = build_paragraph_prompt(paragraph);
            let request =
                CompletionRequest::new(prompt.system, prompt.user, SamplingParams::paragraph());

            match self.provider.complete(request).await {
                Ok(content) => corrected.push(content.trim().to_string()),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!("Paragraph correction failed, keeping original: {}", e);
                    corrected.push(paragraph.to_string());
                }
            }
        }

        Ok(corrected.join("\n\n"))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::InferenceProvider;
    use crate::config::{PaymentConfig, RedirectCredential};
    use crate::payment::TokenSigner;
    use crate::types::{Genre, Language};
    use async_trait::async_trait;
    use secrecy::SecretString;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Provider returning canned responses in order, recording every request
    struct ScriptedProvider {
        responses: Mutex<VecDeque<Result<String>>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<Result<String>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into_iter().collect()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl InferenceProvider for ScriptedProvider {
        async fn complete(&self, request: CompletionRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TinteroError::MalformedResponse("script ran dry".into())))
        }

        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted-model"
        }
    }

    /// Observer recording which stages surfaced output
    #[derive(Default)]
    struct RecordingObserver {
        analysis: Mutex<Option<String>>,
        correction: Mutex<Option<CorrectionResult>>,
        document_bytes: Mutex<usize>,
    }

    impl StageObserver for RecordingObserver {
        fn on_analysis(&self, analysis: &AnalysisResult) {
            *self.analysis.lock().unwrap() = Some(analysis.content().to_string());
        }

        fn on_correction(&self, correction: &CorrectionResult) {
            *self.correction.lock().unwrap() = Some(correction.clone());
        }

        fn on_document(&self, buffer: &[u8]) {
            *self.document_bytes.lock().unwrap() = buffer.len();
        }
    }

    fn submission(text: &str) -> TextSubmission {
        TextSubmission::new(text, Genre::Fantasia, "adultos jóvenes", Language::Es)
    }

    fn story(words: usize) -> String {
        let mut text = String::from("La torre guardaba un secreto antiguo.");
        let filler_words = words.saturating_sub(crate::types::word_count(&text));
        for _ in 0..filler_words {
            text.push_str(" bruma");
        }
        text
    }

    fn pipeline(provider: Arc<ScriptedProvider>, config: PipelineConfig) -> Pipeline {
        Pipeline::new(
            provider,
            None,
            DocumentExporter::new("Informe de Prueba"),
            config,
        )
        .unwrap()
    }

    fn gated_pipeline(
        provider: Arc<ScriptedProvider>,
        gate_mode: GateMode,
    ) -> (Pipeline, TokenSigner) {
        let payment_config = PaymentConfig {
            secret_key: Some("sk_test_key".to_string()),
            signing_secret: Some("pipeline-test-secret".to_string()),
            redirect: RedirectCredential::SignedToken,
            ..PaymentConfig::default()
        };
        let gate = Arc::new(PaymentGate::new(&payment_config).unwrap());
        let signer = TokenSigner::new(SecretString::from("pipeline-test-secret"), 30);

        let pipeline = Pipeline::new(
            provider,
            Some(gate),
            DocumentExporter::new("Informe de Prueba"),
            PipelineConfig {
                gate: gate_mode,
                ..PipelineConfig::default()
            },
        )
        .unwrap();

        (pipeline, signer)
    }

    #[tokio::test]
    async fn test_end_to_end_run_with_gating_disabled() {
        let provider = ScriptedProvider::new(vec![
            Ok("**Temas**: el destino y la bruma.".to_string()),
            Ok("La torre guardaba [mayúscula inicial] un secreto.".to_string()),
        ]);
        let pipeline = pipeline(provider.clone(), PipelineConfig::default());
        let observer = RecordingObserver::default();

        let output = pipeline
            .run(&submission(&story(500)), &AccessContext::default(), &observer)
            .await
            .unwrap();

        // Analysis prompt interpolated the submission fields verbatim
        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].user.contains("**Género:** Fantasía"));
        assert!(requests[0].user.contains("**Audiencia:** adultos jóvenes"));
        assert!(requests[0].user.contains("La torre guardaba un secreto antiguo."));
        assert_eq!(requests[0].params, SamplingParams::analysis());

        // Correction prompt chained the analysis content
        assert!(requests[1].user.contains("**Temas**: el destino y la bruma."));
        assert_eq!(requests[1].params, SamplingParams::correction());

        // Parsed output and document
        assert!(!output.correction.is_empty());
        assert_eq!(
            output.correction.segments[0].justification.as_deref(),
            Some("mayúscula inicial")
        );
        assert_eq!(&output.document[..4], b"PK\x03\x04");

        // Observer saw every stage
        assert!(observer.analysis.lock().unwrap().is_some());
        assert!(observer.correction.lock().unwrap().is_some());
        assert!(*observer.document_bytes.lock().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_word_count_boundary() {
        // Exactly at the limit: accepted
        let provider = ScriptedProvider::new(vec![
            Ok("análisis".to_string()),
            Ok("corrección [ok]".to_string()),
        ]);
        let pipeline = pipeline(provider, PipelineConfig::default());
        let at_limit = submission(&story(2000));
        assert_eq!(at_limit.word_count(), 2000);
        assert!(
            pipeline
                .run(&at_limit, &AccessContext::default(), &NullObserver)
                .await
                .is_ok()
        );

        // One word over: rejected with the exact count, no network call
        let provider = ScriptedProvider::new(vec![]);
        let pipeline = self::pipeline(provider.clone(), PipelineConfig::default());
        let over = submission(&story(2001));
        assert_eq!(over.word_count(), 2001);

        let err = pipeline
            .run(&over, &AccessContext::default(), &NullObserver)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("2001 words"));
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn test_minimum_word_bound_variant() {
        let provider = ScriptedProvider::new(vec![]);
        let config = PipelineConfig {
            min_words: 50,
            ..PipelineConfig::default()
        };
        let pipeline = pipeline(provider.clone(), config);

        let err = pipeline
            .run(&submission("muy corto"), &AccessContext::default(), &NullObserver)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("50 word minimum"));
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn test_empty_fields_rejected_before_network() {
        let provider = ScriptedProvider::new(vec![]);
        let pipeline = pipeline(provider.clone(), PipelineConfig::default());

        let err = pipeline
            .run(&submission("   "), &AccessContext::default(), &NullObserver)
            .await
            .unwrap_err();
        assert!(matches!(err, TinteroError::Validation(_)));

        let mut no_audience = submission(&story(100));
        no_audience.audience = "  ".to_string();
        let err = pipeline
            .run(&no_audience, &AccessContext::default(), &NullObserver)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("audience"));

        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn test_correction_failure_halts_but_analysis_stays_visible() {
        let provider = ScriptedProvider::new(vec![
            Ok("análisis visible".to_string()),
            Err(TinteroError::Upstream {
                status: 503,
                body: "overloaded".into(),
            }),
        ]);
        let pipeline = pipeline(provider, PipelineConfig::default());
        let observer = RecordingObserver::default();

        let err = pipeline
            .run(&submission(&story(100)), &AccessContext::default(), &observer)
            .await
            .unwrap_err();

        assert!(matches!(err, TinteroError::Upstream { status: 503, .. }));
        // The analysis already surfaced and survives the halt
        assert_eq!(
            observer.analysis.lock().unwrap().as_deref(),
            Some("análisis visible")
        );
        assert!(observer.correction.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_paragraph_fallback_keeps_failed_paragraphs() {
        let provider = ScriptedProvider::new(vec![
            Ok("análisis".to_string()),
            Ok("Primer párrafo corregido.".to_string()),
            Err(TinteroError::transport("chat completion", "timed out")),
        ]);
        let config = PipelineConfig {
            correction: CorrectionPolicy::ParagraphFallback,
            ..PipelineConfig::default()
        };
        let pipeline = pipeline(provider.clone(), config);

        let text = format!("{}\n\nSegundo parrafo con errores.", story(60));
        let output = pipeline
            .run(&submission(&text), &AccessContext::default(), &NullObserver)
            .await
            .unwrap();

        // Three calls: analysis + one per paragraph
        assert_eq!(provider.requests().len(), 3);
        // The failed paragraph was re-emitted unchanged
        let flattened = output.correction.flatten();
        assert!(flattened.contains("Primer párrafo corregido."));
        assert!(flattened.contains("Segundo parrafo con errores."));
    }

    #[tokio::test]
    async fn test_fatal_error_halts_paragraph_fallback() {
        let provider = ScriptedProvider::new(vec![
            Ok("análisis".to_string()),
            Err(TinteroError::MissingCredential("api key vanished".into())),
        ]);
        let config = PipelineConfig {
            correction: CorrectionPolicy::ParagraphFallback,
            ..PipelineConfig::default()
        };
        let pipeline = pipeline(provider, config);

        let err = pipeline
            .run(&submission(&story(60)), &AccessContext::default(), &NullObserver)
            .await
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_gate_before_analysis_blocks_without_credential() {
        let provider = ScriptedProvider::new(vec![]);
        let (pipeline, _) = gated_pipeline(provider.clone(), GateMode::BeforeAnalysis);

        let err = pipeline
            .run(
                &submission(&story(100)),
                &AccessContext::default(),
                &NullObserver,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, TinteroError::PaymentRequired(_)));
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn test_gate_before_export_allows_free_analysis() {
        let provider = ScriptedProvider::new(vec![Ok("análisis libre".to_string())]);
        let (pipeline, _) = gated_pipeline(provider.clone(), GateMode::BeforeExport);
        let observer = RecordingObserver::default();

        let err = pipeline
            .run(
                &submission(&story(100)),
                &AccessContext::new(
                    Some(PaymentCredential::Token("invalid".to_string())),
                    false,
                ),
                &observer,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, TinteroError::PaymentRequired(_)));
        // Analysis ran for free and surfaced before the gate denied
        assert_eq!(provider.requests().len(), 1);
        assert_eq!(
            observer.analysis.lock().unwrap().as_deref(),
            Some("análisis libre")
        );
    }

    #[tokio::test]
    async fn test_gate_accepts_valid_token() {
        let provider = ScriptedProvider::new(vec![
            Ok("análisis".to_string()),
            Ok("corrección [ok]".to_string()),
        ]);
        let (pipeline, signer) = gated_pipeline(provider, GateMode::BeforeAnalysis);
        let token = signer.mint().unwrap();

        let output = pipeline
            .run(
                &submission(&story(100)),
                &AccessContext::new(Some(PaymentCredential::Token(token)), false),
                &NullObserver,
            )
            .await
            .unwrap();
        assert!(!output.document.is_empty());
    }

    #[tokio::test]
    async fn test_canceled_checkout_denies_access() {
        let provider = ScriptedProvider::new(vec![]);
        let (pipeline, signer) = gated_pipeline(provider, GateMode::BeforeAnalysis);
        let token = signer.mint().unwrap();

        let err = pipeline
            .run(
                &submission(&story(100)),
                &AccessContext::new(Some(PaymentCredential::Token(token)), true),
                &NullObserver,
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("canceled"));
    }

    #[test]
    fn test_enabled_gate_mode_requires_a_gate() {
        let provider = ScriptedProvider::new(vec![]);
        let result = Pipeline::new(
            provider,
            None,
            DocumentExporter::new("Informe"),
            PipelineConfig {
                gate: GateMode::BeforeAnalysis,
                ..PipelineConfig::default()
            },
        );
        assert!(matches!(result, Err(TinteroError::Config(_))));
    }
}
