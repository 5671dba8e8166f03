use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tintero::types::{Genre, Language};

/// Parse genre from string
fn parse_genre(s: &str) -> Result<Genre, String> {
    Genre::parse(s).ok_or_else(|| {
        format!(
            "Invalid genre '{}'. Valid values: fantasia, ciencia-ficcion, misterio, romance, \
             terror, aventura, drama, historico, otro",
            s
        )
    })
}

/// Parse language from string
fn parse_language(s: &str) -> Result<Language, String> {
    Language::parse(s)
        .ok_or_else(|| format!("Invalid language '{}'. Valid values: es, en, fr, it, de, pt", s))
}

#[derive(Parser)]
#[command(name = "tintero")]
#[command(
    version,
    about = "Literary analysis and style correction powered by hosted LLMs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize Tintero in the current directory
    Init {
        #[arg(long, short, help = "Overwrite existing initialization")]
        force: bool,
    },

    /// Analyze and correct a text submission
    Run {
        #[arg(long, short, help = "Path to the text file to process")]
        input: PathBuf,

        #[arg(long, short, value_parser = parse_genre, help = "Genre: fantasia, ciencia-ficcion, misterio, romance, terror, aventura, drama, historico, otro")]
        genre: Genre,

        #[arg(long, short, help = "Target audience, e.g. 'adultos jóvenes'")]
        audience: String,

        #[arg(long, short, value_parser = parse_language, default_value = "es", help = "Language: es, en, fr, it, de, pt")]
        language: Language,

        #[arg(long, short, help = "Output document path (defaults to the configured filename)")]
        output: Option<PathBuf>,

        #[arg(long, help = "Signed access token from the payment redirect")]
        token: Option<String>,

        #[arg(long, help = "Checkout session id from the payment redirect")]
        session_id: Option<String>,

        #[arg(long, help = "The checkout was canceled on redirect")]
        canceled: bool,
    },

    /// Create a payment checkout session
    Checkout,

    /// Verify a payment credential
    Verify {
        #[arg(long, help = "Signed access token to verify")]
        token: Option<String>,

        #[arg(long, help = "Checkout session id to verify")]
        session_id: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'g', long, help = "Show global config file only")]
        global: bool,
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mTintero encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }

        eprintln!();

        // Call default hook for backtrace (if RUST_BACKTRACE=1)
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Init { force } => {
            tintero::cli::commands::init::run(force)?;
        }
        Commands::Run {
            input,
            genre,
            audience,
            language,
            output,
            token,
            session_id,
            canceled,
        } => {
            use tintero::cli::commands::run::RunOptions;

            let rt = Runtime::new()?;
            rt.block_on(tintero::cli::commands::run::run(RunOptions {
                input,
                genre,
                audience,
                language,
                output,
                token,
                session_id,
                canceled,
            }))?;
        }
        Commands::Checkout => {
            let rt = Runtime::new()?;
            rt.block_on(tintero::cli::commands::checkout::run())?;
        }
        Commands::Verify { token, session_id } => {
            let rt = Runtime::new()?;
            rt.block_on(tintero::cli::commands::verify::run(token, session_id))?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { global, format } => {
                tintero::cli::commands::config::show(global, &format)?;
            }
            ConfigAction::Path => {
                tintero::cli::commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                if global {
                    tintero::cli::commands::config::init_global(force)?;
                } else {
                    tintero::cli::commands::config::init_project()?;
                }
            }
        },
    }

    Ok(())
}
