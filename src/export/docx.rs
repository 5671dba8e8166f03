//! Docx Renderer
//!
//! Pure transform from pipeline output to an in-memory docx buffer: a
//! centered title, a heading + paragraph for the analysis, and one paragraph
//! per correction segment with the justification portion colored and its
//! literal brackets preserved. No network or filesystem side effects.

use docx_rs::{AlignmentType, Docx, Paragraph, Run};
use std::io::Cursor;

use crate::constants::export::{BODY_SIZE, JUSTIFICATION_COLOR, TITLE_SIZE};
use crate::correction::CorrectionResult;
use crate::types::{AnalysisResult, Result, TinteroError};

/// Renders analysis + correction into a docx byte buffer
#[derive(Debug, Clone)]
pub struct DocumentExporter {
    title: String,
}

impl DocumentExporter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Render the document and pack it into a byte buffer.
    pub fn render(
        &self,
        analysis: &AnalysisResult,
        correction: &CorrectionResult,
    ) -> Result<Vec<u8>> {
        let docx = self.build(analysis, correction);

        let mut buffer = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buffer)
            .map_err(|e| TinteroError::Export(e.to_string()))?;

        Ok(buffer.into_inner())
    }

    /// Assemble the document tree. Split out from packing so tests can
    /// inspect the XML without unzipping the container.
    fn build(&self, analysis: &AnalysisResult, correction: &CorrectionResult) -> Docx {
        let mut docx = Docx::new().add_paragraph(
            Paragraph::new().align(AlignmentType::Center).add_run(
                Run::new()
                    .add_text(self.title.as_str())
                    .bold()
                    .size(TITLE_SIZE),
            ),
        );

        docx = docx.add_paragraph(heading("Análisis Literario"));
        for line in analysis.content().lines() {
            docx = docx
                .add_paragraph(Paragraph::new().add_run(Run::new().add_text(line).size(BODY_SIZE)));
        }

        docx = docx.add_paragraph(heading("Corrección de Estilo con Justificaciones"));
        for segment in &correction.segments {
            let mut paragraph = Paragraph::new()
                .add_run(Run::new().add_text(segment.text.as_str()).size(BODY_SIZE));

            if let Some(justification) = &segment.justification {
                paragraph = paragraph.add_run(
                    Run::new()
                        .add_text(format!("[{}]", justification))
                        .size(BODY_SIZE)
                        .color(JUSTIFICATION_COLOR),
                );
            }

            docx = docx.add_paragraph(paragraph);
        }

        docx
    }
}

fn heading(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).bold().size(BODY_SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correction::CorrectionSegment;

    fn sample_correction() -> CorrectionResult {
        CorrectionResult {
            segments: vec![
                CorrectionSegment::justified("Había una vez ", "tilde añadida"),
                CorrectionSegment::plain(" un final tranquilo."),
            ],
        }
    }

    fn document_xml(exporter: &DocumentExporter, correction: &CorrectionResult) -> String {
        let analysis = AnalysisResult::new("**Temas**\nLa pérdida y la memoria.");
        let xml = exporter.build(&analysis, correction).build();
        String::from_utf8(xml.document).unwrap()
    }

    #[test]
    fn test_render_produces_zip_container() {
        let exporter = DocumentExporter::new("Informe");
        let buffer = exporter
            .render(&AnalysisResult::new("análisis"), &sample_correction())
            .unwrap();

        // docx is a zip archive
        assert!(buffer.len() > 4);
        assert_eq!(&buffer[..4], b"PK\x03\x04");
    }

    #[test]
    fn test_document_contains_both_sections() {
        let exporter = DocumentExporter::new("Informe de Estilo");
        let xml = document_xml(&exporter, &sample_correction());

        assert!(xml.contains("Informe de Estilo"));
        assert!(xml.contains("Análisis Literario"));
        assert!(xml.contains("La pérdida y la memoria."));
        assert!(xml.contains("Había una vez "));
    }

    #[test]
    fn test_justification_is_colored_with_literal_brackets() {
        let exporter = DocumentExporter::new("Informe");
        let xml = document_xml(&exporter, &sample_correction());

        assert!(xml.contains("[tilde añadida]"));
        assert!(xml.contains(JUSTIFICATION_COLOR));
    }

    #[test]
    fn test_segment_order_is_preserved() {
        let exporter = DocumentExporter::new("Informe");
        let correction = CorrectionResult {
            segments: vec![
                CorrectionSegment::justified("primero", "a"),
                CorrectionSegment::justified("segundo", "b"),
                CorrectionSegment::plain("tercero"),
            ],
        };
        let xml = document_xml(&exporter, &correction);

        let first = xml.find("primero").unwrap();
        let second = xml.find("segundo").unwrap();
        let third = xml.find("tercero").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_empty_correction_still_renders() {
        let exporter = DocumentExporter::new("Informe");
        let buffer = exporter
            .render(&AnalysisResult::new(""), &CorrectionResult::default())
            .unwrap();
        assert!(!buffer.is_empty());
    }
}
