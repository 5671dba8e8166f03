//! Document Export
//!
//! Renders the analysis and parsed correction segments into a downloadable
//! word-processing document, entirely in memory.

mod docx;

pub use docx::DocumentExporter;
