use clap::Parser;
use botwatch::cli::print_config;
use botwatch::cli::print_error;
use botwatch::cli::print_success;
use botwatch::cli::print_summary;
use botwatch::cli::Cli;
use botwatch::config::AppConfig;
use botwatch::report::ConsoleSink;
use botwatch::scan::DetectionJob;
use botwatch::scan::RunMode;
use botwatch::scan::ScanOptions;
use botwatch::scan::Scanner;
use botwatch::scan::Scheduler;
use botwatch::source::RedditClient;
use botwatch::Result;
use tokio::sync::watch;
use tracing::info;
use tracing::warn;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        print_error(&format!("{e}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Configuration errors are fatal before anything else starts
    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load()?,
    };

    if cli.check_config {
        print_config(&config);
        print_success("Configuration check completed successfully!");
        return Ok(());
    }

    // Initialize logging
    if cli.verbose {
        botwatch::logging::init_logging_with_level("debug")?;
    } else {
        botwatch::logging::init_logging_with_config(&config)?;
    }
    info!("Configuration loaded successfully");

    let target_user = cli.target_user();
    if let Some(user) = &target_user {
        info!("Targeting individual user u/{}", user);
    }

    let source = RedditClient::from_config(&config)?;
    let options = ScanOptions::from_config(&config, target_user);
    let scanner = Scanner::new(source, ConsoleSink::stdout(), options);
    let mut job = DetectionJob::new(scanner, config.scan.counter_policy);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl-C, shutting down");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                warn!("Failed to listen for Ctrl-C: {}", e);
                // Dropping the sender would read as a shutdown request
                std::future::pending::<()>().await;
            }
        }
    });

    let mode = cli.run_mode();
    let mut scheduler = Scheduler::new(mode, config.run_frequency());
    let last_summary = scheduler.run(&mut job, shutdown_rx).await?;

    if mode == RunMode::Once {
        if let Some(summary) = &last_summary {
            print_summary(summary);
        }
    } else {
        info!(
            "Stopped after {} passes ({} failed)",
            scheduler.passes(),
            scheduler.failures()
        );
    }
    Ok(())
}
