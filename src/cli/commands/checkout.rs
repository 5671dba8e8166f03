//! Checkout Command
//!
//! Create a payment checkout session and print the hosted URL.

use console::style;

use crate::config::ConfigLoader;
use crate::payment::PaymentGate;
use crate::types::Result;

pub async fn run() -> Result<()> {
    let config = ConfigLoader::load()?;
    let gate = PaymentGate::new(&config.payment)?;

    let session = gate.create_session().await?;

    println!("✓ Checkout session created");
    println!("  Session: {}", session.id);
    println!();
    println!("Complete the payment at:");
    println!("  {}", style(&session.url).cyan().underlined());
    println!();
    println!("After the redirect, pass the returned credential to 'tintero run'");
    println!("via --session-id or --token.");

    Ok(())
}
