//! Run Command
//!
//! Execute the full pipeline for one submission: validation, optional
//! payment gate, analysis, correction, and document export. Stage output is
//! printed as it lands, so a failed later stage leaves earlier results on
//! screen.

use std::path::PathBuf;
use std::sync::Arc;

use console::style;

use crate::ai::{SharedProvider, TogetherProvider};
use crate::config::ConfigLoader;
use crate::correction::CorrectionResult;
use crate::export::DocumentExporter;
use crate::payment::{PaymentCredential, PaymentGate};
use crate::pipeline::{AccessContext, Pipeline, StageObserver};
use crate::types::{AnalysisResult, Genre, Language, Result, TextSubmission};

pub struct RunOptions {
    pub input: PathBuf,
    pub genre: Genre,
    pub audience: String,
    pub language: Language,
    pub output: Option<PathBuf>,
    pub token: Option<String>,
    pub session_id: Option<String>,
    pub canceled: bool,
}

/// Prints stage output to the terminal as the pipeline progresses
struct ConsoleObserver;

impl StageObserver for ConsoleObserver {
    fn on_analysis(&self, analysis: &AnalysisResult) {
        println!();
        println!("{}", style("Análisis Literario").bold());
        println!("{}", analysis.content());
    }

    fn on_correction(&self, correction: &CorrectionResult) {
        println!();
        println!(
            "{}",
            style("Corrección de Estilo con Justificaciones").bold()
        );
        for segment in &correction.segments {
            print!("{}", segment.text);
            if let Some(justification) = &segment.justification {
                print!("{}", style(format!("[{}]", justification)).red());
            }
        }
        println!();
    }
}

pub async fn run(options: RunOptions) -> Result<()> {
    let config = ConfigLoader::load()?;

    let raw_text = std::fs::read_to_string(&options.input)?;
    let submission =
        TextSubmission::new(raw_text, options.genre, options.audience, options.language);

    let provider: SharedProvider = Arc::new(TogetherProvider::new(&config.inference)?);
    let gate = if config.pipeline.gate.is_enabled() {
        Some(Arc::new(PaymentGate::new(&config.payment)?))
    } else {
        None
    };
    let exporter = DocumentExporter::new(config.export.title.clone());
    let pipeline = Pipeline::new(provider, gate, exporter, config.pipeline.clone())?;

    // Access state is derived once from the request-scoped parameters
    let access = AccessContext::new(
        PaymentCredential::from_request(options.token, options.session_id),
        options.canceled,
    );

    let output = pipeline.run(&submission, &access, &ConsoleObserver).await?;

    let out_path = options
        .output
        .unwrap_or_else(|| PathBuf::from(&config.export.filename));
    std::fs::write(&out_path, &output.document)?;

    println!();
    println!("✓ Saved document: {}", out_path.display());

    Ok(())
}
