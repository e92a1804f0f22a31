//! Container app CLI application
//!
//! Command-line interface for creating and inspecting container apps from
//! YAML/JSON manifests.

use std::process;

use tracing::{debug, info};
use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

use containerapp::cli::{handle_configure, handle_create, handle_show, handle_verify, Cli, Commands};
use containerapp::config::AppConfig;
use containerapp::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        debug!(category = e.category(), fatal = e.is_fatal(), "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();

    // configure creates the file, so it may not exist yet
    let config = match cli.command {
        Commands::Configure(_) => AppConfig::load_or_default(cli.global.config.clone()).await?,
        _ => AppConfig::load(cli.global.config.clone()).await?,
    };

    init_logging(&cli, &config);

    info!("containerapp v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Create(args) => {
            info!("Executing create command");
            handle_create(args, &config).await
        }
        Commands::Show(args) => {
            info!("Executing show command");
            handle_show(args, &config).await
        }
        Commands::Verify(args) => {
            info!("Executing verify command");
            handle_verify(args, &config).await
        }
        Commands::Configure(args) => {
            info!("Executing configure command");
            handle_configure(args, cli.global.config).await
        }
    }
}

/// Initialize logging from the verbosity flags, falling back to the configured level
///
/// Logs go to stderr so stdout carries only command output.
fn init_logging(cli: &Cli, config: &AppConfig) {
    let log_level = match (cli.explicit_log_level(), config.logging.level.as_deref()) {
        (Some(level), _) => level.to_string(),
        (None, Some(configured)) => configured.to_ascii_lowercase(),
        (None, None) => cli.log_level().to_string(),
    };

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("containerapp={}", log_level).parse::<Directive>() {
        filter = filter.add_directive(directive);
    }

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(cli.global.very_verbose) // Show levels only in very verbose mode
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
