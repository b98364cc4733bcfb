mod cli;

use unwebp::{config, conversion, notifications, service};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

async fn start_watching(config_path: Option<&Path>, dir: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let directory = service::resolve_directory(&config, dir)?;

    tracing::info!("Starting unwebp on {}", directory.display());

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel.clone()));

    service::run(&config, &directory, cancel).await?;

    tracing::info!("Shutting down...");
    Ok(())
}

/// Wait for the exit action (SIGINT or SIGTERM) and cancel the watcher.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
    cancel.cancel();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "unwebp=trace".to_string()
        } else {
            "unwebp=debug".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { dir } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_watching(cli.config.as_deref(), dir.as_deref()))
        }
        Commands::Convert { file } => convert_file(&file, cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("unwebp {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn convert_file(input: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    if !input.is_file() {
        anyhow::bail!("Input file does not exist: {:?}", input);
    }

    if !conversion::is_source_file(input) {
        anyhow::bail!(
            "Input file does not have a .{} extension: {:?}",
            conversion::SOURCE_EXTENSION,
            input
        );
    }

    let notifier = Arc::new(notifications::NotificationManager::new(
        &config.notifications,
    ));
    let converter = conversion::Converter::webp_to_png(notifier);
    let result = converter.convert(input);

    match result.error() {
        None => {
            println!("{}", result.target_path.display());
            Ok(())
        }
        Some(e) => anyhow::bail!("Failed to convert {:?}: {}", input, e),
    }
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            print_summary(&config);
        }
        None => {
            println!("No config file specified, using defaults");
            print_summary(&config::Config::default());
        }
    }

    Ok(())
}

fn print_summary(config: &config::Config) {
    match config.watch.resolve_directory() {
        Some(dir) => println!("  Directory: {}", dir.display()),
        None => println!("  Directory: (unknown)"),
    }
    println!("  Settle delay: {}ms", config.watch.settle_delay_ms);
    println!("  Debounce window: {}s", config.watch.debounce_secs);
    println!("  Log notifications: {}", config.notifications.log);
    if let Some(ref command) = config.notifications.command {
        println!("  Notification command: {}", command.join(" "));
    }
}
