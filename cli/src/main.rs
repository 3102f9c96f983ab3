//! CLI entrypoint for shortlist
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, bail};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use shortlist_application::{
    AuditLogger, RunCommandError, RunCommandUseCase, SessionView, ViewSessionUseCase,
};
use shortlist_domain::OutputFormat;
use shortlist_infrastructure::{ConfigLoader, FileConfig, JsonFileSessionStore, JsonlAuditLogger};
use shortlist_presentation::{Cli, ConsoleFormatter, OutputConfig};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // === Configuration ===
    let config: FileConfig = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())?
    };

    let issues = config.validate();
    for issue in &issues {
        warn!("{}", issue.message);
    }
    if issues.iter().any(|issue| issue.is_error()) {
        bail!("Invalid configuration, see the messages above");
    }

    let output = OutputConfig::resolve(
        cli.output.map(Into::into),
        config.output.format,
        config.output.color,
        cli.no_color,
    );
    if !output.color {
        colored::control::set_override(false);
    }

    // === Dependency Injection ===
    let store_path = cli
        .store
        .clone()
        .unwrap_or_else(|| config.store.path_buf());
    info!("Using session record {}", store_path.display());
    let store = Arc::new(
        JsonFileSessionStore::new(store_path).with_lock_timeout(config.store.lock_timeout()),
    );

    let command = cli.command.as_ref().and_then(|c| c.to_command());
    let Some(command) = command else {
        let view = ViewSessionUseCase::new(store).execute().await;
        return match view {
            Ok(view) => {
                println!("{}", ConsoleFormatter::render(&view, output.format));
                Ok(())
            }
            Err(error) => exit_with(&RunCommandError::from(error), output.format),
        };
    };

    let mut use_case = RunCommandUseCase::new(store);
    if let Some(seed) = cli.seed {
        use_case = use_case.with_rng(StdRng::seed_from_u64(seed));
    }
    if config.audit.enabled
        && let Some(logger) = JsonlAuditLogger::new(&config.audit.path)
    {
        info!("Auditing commands to {}", logger.path().display());
        use_case = use_case.with_audit_logger(Arc::new(logger) as Arc<dyn AuditLogger>);
    }

    match use_case.execute(command).await {
        Ok(session) => {
            let view = SessionView::from_session(session);
            println!("{}", ConsoleFormatter::render(&view, output.format));
            Ok(())
        }
        Err(error) => exit_with(&error, output.format),
    }
}

fn exit_with(error: &RunCommandError, format: OutputFormat) -> ! {
    if format == OutputFormat::Json {
        println!("{}", ConsoleFormatter::format_error_json(error));
    } else {
        eprintln!("{}", ConsoleFormatter::format_error(error));
    }
    std::process::exit(1)
}
