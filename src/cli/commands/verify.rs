//! Verify Command
//!
//! Check whether a payment credential grants access.

use console::style;

use crate::config::ConfigLoader;
use crate::payment::{PaymentCredential, PaymentGate};
use crate::types::{Result, TinteroError, ValidationError};

pub async fn run(token: Option<String>, session_id: Option<String>) -> Result<()> {
    let credential = PaymentCredential::from_request(token, session_id).ok_or_else(|| {
        TinteroError::Validation(ValidationError::new(
            "provide --token or --session-id to verify",
        ))
    })?;

    let config = ConfigLoader::load()?;
    let gate = PaymentGate::new(&config.payment)?;

    if gate.verify(&credential).await {
        println!("{} payment verified, access granted", style("✓").green());
    } else {
        println!(
            "{} payment could not be verified, access denied",
            style("✗").red()
        );
    }

    Ok(())
}
