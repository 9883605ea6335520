//! CLI output formatting utilities
//!
//! This module provides consistent output formatting for the `botwatch` CLI

use crate::models::ScanSummary;
use crate::AppConfig;

/// Safely truncate a string at character boundary (not byte boundary)
///
/// This prevents panics when truncating strings with multi-byte UTF-8 characters (emojis, etc.)
///
/// # Arguments
/// * `s` - The string to truncate
/// * `max_chars` - Maximum number of characters (not bytes)
///
/// # Returns
/// Truncated string with "..." suffix if truncated, otherwise the original string
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Keep the first two characters of a secret, mask the rest
fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(2).collect();
    format!("{visible}***")
}

/// Print configuration
pub fn print_config(config: &AppConfig) {
    println!("📋 botwatch configuration:");
    println!();

    println!("🔑 Reddit:");
    println!("  Username: u/{}", config.reddit.username);
    println!("  Client ID: {}", mask_secret(&config.reddit.client_id));
    println!("  Client secret: {}", mask_secret(&config.reddit.client_secret));
    println!("  User agent: {}", config.reddit.user_agent);
    println!("  API: {}", config.reddit.api_base_url);
    println!("  Request timeout: {}s", config.reddit.request_timeout_secs);
    println!();

    println!("🔍 Scan:");
    println!("  Subreddit: r/{}", config.target_subreddit());
    println!("  Submissions per pass: {}", config.submission_limit());
    println!("  Run every: {} minutes", config.scan.run_frequency_minutes);
    println!("  Duplicate threshold: {}", config.duplicate_threshold());
    println!("  Report cadence: {:?}", config.scan.report_cadence);
    println!("  Counter policy: {:?}", config.scan.counter_policy);
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
}

/// Print the totals of a finished pass
pub fn print_summary(summary: &ScanSummary) {
    print_info(&format!(
        "Scanned {} submissions ({} skipped), counted {} of {} comments, {} possible bots",
        summary.submissions_scanned,
        summary.submissions_skipped,
        summary.comments_counted,
        summary.comments_seen,
        summary.findings.len()
    ));
}

/// Print colored output functions
pub fn print_info(msg: &str) {
    println!("ℹ️  {msg}");
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}

pub fn print_error(msg: &str) {
    eprintln!("❌ {msg}");
}
