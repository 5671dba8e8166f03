//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Submission bounds
pub mod words {
    /// Default minimum word count (some deployments raise this to 50)
    pub const DEFAULT_MIN_WORDS: usize = 0;

    /// Default maximum word count
    pub const DEFAULT_MAX_WORDS: usize = 2000;
}

/// Sampling parameters per pipeline stage
pub mod sampling {
    /// Nucleus sampling shared by every stage
    pub const TOP_P: f32 = 0.7;

    /// Top-k sampling shared by every stage
    pub const TOP_K: u32 = 50;

    /// Repetition penalty shared by every stage
    pub const REPETITION_PENALTY: f32 = 1.0;

    /// Stop sequence shared by every stage
    pub const STOP_SEQUENCE: &str = "<|eot_id|>";

    /// Literary analysis stage
    pub mod analysis {
        pub const MAX_TOKENS: u32 = 2000;
        pub const TEMPERATURE: f32 = 0.5;
    }

    /// Whole-text correction stage (justifications inflate the output)
    pub mod correction {
        pub const MAX_TOKENS: u32 = 3000;
        pub const TEMPERATURE: f32 = 0.5;
    }

    /// Paragraph-batch correction stage
    pub mod paragraph {
        pub const MAX_TOKENS: u32 = 2512;
        pub const TEMPERATURE: f32 = 0.7;
    }
}

/// HTTP/Network constants
pub mod network {
    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// Connection timeout (seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 10;
}

/// Payment gate constants
pub mod payment {
    /// Signed access token validity window (minutes)
    pub const TOKEN_VALIDITY_MINS: u64 = 30;

    /// Purpose claim marking a completed payment
    pub const PURPOSE_PAYMENT_COMPLETED: &str = "payment-completed";

    /// Placeholder the provider substitutes with the session id on redirect
    pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

    /// Default fixed charge in minor units when no product price is resolved
    pub const DEFAULT_UNIT_AMOUNT: u64 = 5000;

    /// Default charge currency
    pub const DEFAULT_CURRENCY: &str = "usd";
}

/// Document export constants
pub mod export {
    /// Body font size in half-points (12pt)
    pub const BODY_SIZE: usize = 24;

    /// Title font size in half-points (16pt)
    pub const TITLE_SIZE: usize = 32;

    /// Color applied to justification runs (hex RGB, no '#')
    pub const JUSTIFICATION_COLOR: &str = "C00000";

    /// Default output filename
    pub const DEFAULT_FILENAME: &str = "informe-analisis-literario.docx";
}
