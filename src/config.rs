use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::errors::BotWatchError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditConfig {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    /// Per-request timeout; a hung fetch would otherwise block the whole loop
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

pub(crate) fn default_user_agent() -> String {
    format!("botwatch/{} (duplicate comment detector)", env!("CARGO_PKG_VERSION"))
}

pub(crate) fn default_api_base_url() -> String {
    "https://oauth.reddit.com".to_string()
}

pub(crate) fn default_auth_url() -> String {
    "https://www.reddit.com/api/v1/access_token".to_string()
}

pub(crate) const fn default_request_timeout_secs() -> u64 {
    30
}

/// When findings are emitted during a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportCadence {
    /// After every submission (on the cumulative counters) and again at the end
    #[default]
    Cumulative,
    /// Once, after the whole window
    FinalOnly,
}

/// Whether counters survive from one scheduled pass to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CounterPolicy {
    #[default]
    ResetEachPass,
    Accumulate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    pub target_subreddit: String,
    pub submission_limit: u32,
    pub run_frequency_minutes: u64,
    #[serde(default = "default_duplicate_threshold")]
    pub duplicate_threshold: u32,
    #[serde(default)]
    pub report_cadence: ReportCadence,
    #[serde(default)]
    pub counter_policy: CounterPolicy,
}

pub(crate) const fn default_duplicate_threshold() -> u32 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub reddit: RedditConfig,
    pub scan: ScanConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse, apply environment overrides and validate
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let mut config: AppConfig = toml::from_str(content)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default config file path
    pub fn load() -> crate::Result<Self> {
        // Try to load from config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            tracing::warn!(
                "Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")
        } else {
            Err(BotWatchError::Config(
                "No config file found. Please create config.toml or config.example.toml"
                    .to_string(),
            ))
        }
    }

    /// Credentials may come from the environment instead of the file
    pub fn apply_env_overrides(&mut self) {
        let overrides = [
            ("BOTWATCH_CLIENT_ID", &mut self.reddit.client_id),
            ("BOTWATCH_CLIENT_SECRET", &mut self.reddit.client_secret),
            ("BOTWATCH_USERNAME", &mut self.reddit.username),
            ("BOTWATCH_PASSWORD", &mut self.reddit.password),
        ];
        for (key, slot) in overrides {
            if let Ok(value) = std::env::var(key) {
                if !value.is_empty() {
                    *slot = value;
                }
            }
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        let scan = &self.scan;
        if scan.target_subreddit.trim().is_empty() {
            return Err(BotWatchError::Config(
                "scan.target_subreddit must not be empty".to_string(),
            ));
        }
        if scan.submission_limit == 0 {
            return Err(BotWatchError::Config(
                "scan.submission_limit must be a positive integer".to_string(),
            ));
        }
        if scan.run_frequency_minutes == 0 {
            return Err(BotWatchError::Config(
                "scan.run_frequency_minutes must be a positive integer".to_string(),
            ));
        }
        if scan.duplicate_threshold == 0 {
            return Err(BotWatchError::Config(
                "scan.duplicate_threshold must be a positive integer".to_string(),
            ));
        }

        let reddit = &self.reddit;
        for (name, value) in [
            ("reddit.client_id", &reddit.client_id),
            ("reddit.client_secret", &reddit.client_secret),
            ("reddit.username", &reddit.username),
            ("reddit.password", &reddit.password),
        ] {
            if value.trim().is_empty() {
                return Err(BotWatchError::Config(format!("{name} must not be empty")));
            }
        }
        if reddit.request_timeout_secs == 0 {
            return Err(BotWatchError::Config(
                "reddit.request_timeout_secs must be a positive integer".to_string(),
            ));
        }
        url::Url::parse(&reddit.api_base_url).map_err(|e| {
            BotWatchError::Config(format!("reddit.api_base_url is not a valid URL: {e}"))
        })?;
        url::Url::parse(&reddit.auth_url).map_err(|e| {
            BotWatchError::Config(format!("reddit.auth_url is not a valid URL: {e}"))
        })?;

        Ok(())
    }

    /// Get target subreddit (without the `r/` prefix)
    pub fn target_subreddit(&self) -> &str {
        self.scan
            .target_subreddit
            .trim()
            .trim_start_matches("r/")
    }

    /// Get number of submissions examined per pass
    pub fn submission_limit(&self) -> u32 {
        self.scan.submission_limit
    }

    /// Get pause between passes
    pub fn run_frequency(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.scan.run_frequency_minutes.saturating_mul(60))
    }

    /// Get detection threshold
    pub fn duplicate_threshold(&self) -> u32 {
        self.scan.duplicate_threshold
    }

    /// Get HTTP request timeout
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.reddit.request_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            reddit: RedditConfig {
                client_id: "your-client-id".to_string(),
                client_secret: "your-client-secret".to_string(),
                username: "your-reddit-username".to_string(),
                password: "your-reddit-password".to_string(),
                user_agent: default_user_agent(),
                api_base_url: default_api_base_url(),
                auth_url: default_auth_url(),
                request_timeout_secs: default_request_timeout_secs(),
            },
            scan: ScanConfig {
                target_subreddit: "test".to_string(),
                submission_limit: 25,
                run_frequency_minutes: 30,
                duplicate_threshold: default_duplicate_threshold(),
                report_cadence: ReportCadence::default(),
                counter_policy: CounterPolicy::default(),
            },
            logging: LoggingConfig::default(),
        }
    }
}
