//! Correction Output Handling
//!
//! Parses the correction stage's free-form output into ordered
//! (original span, justification) segments.

mod parser;

pub use parser::{CorrectionParser, CorrectionResult, CorrectionSegment};
