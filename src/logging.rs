//! Logging configuration for botwatch

use std::path::Path;

use tracing_subscriber::fmt;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

use crate::Result;

const LOG_DIR: &str = "logs";
const LOG_FILE_PREFIX: &str = "botwatch.log";

/// Initialize logging with configuration
///
/// A non-empty `RUST_LOG` wins over the configured level.
pub fn init_logging_with_config(config: &crate::config::AppConfig) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directives = filter_directives(rust_log.as_deref(), &config.logging.level);
    install(EnvFilter::new(directives), &config.logging.level)
}

/// Initialize logging with custom log level
pub fn init_logging_with_level(level: &str) -> Result<()> {
    install(EnvFilter::new(filter_directives(None, level)), level)
}

fn filter_directives(rust_log: Option<&str>, level: &str) -> String {
    match rust_log.map(str::trim) {
        Some(directives) if !directives.is_empty() => directives.to_string(),
        _ => format!("{level},botwatch={level}"),
    }
}

fn install(env_filter: EnvFilter, level: &str) -> Result<()> {
    // Create logs directory if it doesn't exist
    let logs_dir = Path::new(LOG_DIR);
    if !logs_dir.exists() {
        std::fs::create_dir_all(logs_dir)?;
    }

    let file_appender = tracing_appender::rolling::daily(LOG_DIR, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Console goes to stderr so stdout stays reserved for the report
    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(non_blocking)
        .with_ansi(false); // No colors in file

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| crate::BotWatchError::Custom(format!("Failed to install logger: {e}")))?;

    tracing::info!("Logging initialized with level: {level} - console and file output enabled");
    tracing::debug!("Log files will be saved to: {LOG_DIR}/{LOG_FILE_PREFIX}.YYYY-MM-DD");

    // The worker must outlive main; dropping the guard would stop file output
    std::mem::forget(guard);

    Ok(())
}

/// Initialize simple logging for testing
pub fn init_simple_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(true)
        .with_max_level(tracing::Level::INFO)
        .with_test_writer()
        .try_init()
        .map_err(|e| crate::BotWatchError::Custom(format!("Failed to install logger: {e}")))?;

    tracing::info!("Simple logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_log_overrides_configured_level() {
        assert_eq!(filter_directives(Some("botwatch=trace"), "info"), "botwatch=trace");
    }

    #[test]
    fn test_configured_level_without_rust_log() {
        assert_eq!(filter_directives(None, "warn"), "warn,botwatch=warn");
        assert_eq!(filter_directives(Some("  "), "debug"), "debug,botwatch=debug");
    }

    #[test]
    fn test_logging_initialization() {
        // Another test may already have installed a subscriber
        let _ = init_simple_logging();
        assert!(init_simple_logging().is_err());
    }
}
