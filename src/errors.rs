use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotWatchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Reddit API error: HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited by Reddit API")]
    RateLimited,

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Custom(String),
}

impl BotWatchError {
    /// Errors that only cost us one submission; the pass keeps going.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) | Self::RateLimited | Self::Serialization(_) => true,
            Self::Api { status, .. } => *status == 404 || *status == 403 || *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, BotWatchError>;
