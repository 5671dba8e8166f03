//! Init Command
//!
//! Initialize Tintero in the current directory.

use crate::config::ConfigLoader;
use crate::types::{Result, TinteroError};

pub fn run(force: bool) -> Result<()> {
    let tintero_dir = ConfigLoader::project_dir();

    if tintero_dir.exists() && !force {
        return Err(TinteroError::Config(
            "Already initialized. Use --force to overwrite.".to_string(),
        ));
    }

    ConfigLoader::init_project()?;

    // Initialize global config if not exists (don't force overwrite)
    if let Err(e) = ConfigLoader::init_global(false) {
        tracing::debug!("Global config init skipped: {}", e);
    }

    println!("✓ Initialized Tintero in .tintero/");
    println!();
    println!("Next steps:");
    println!("  1. Export TOGETHER_API_KEY (and STRIPE_SECRET_KEY if gating is enabled)");
    println!("  2. Run 'tintero run --input <file> --genre <genre> --audience <audience>'");

    Ok(())
}
