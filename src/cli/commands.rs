//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;

use crate::scan::RunMode;

#[derive(Parser, Debug)]
#[command(name = "botwatch")]
#[command(about = "Reddit bot detector: flags accounts posting the same comment across threads")]
#[command(version)]
pub struct Cli {
    /// Target an individual user; only their comments are counted
    #[arg(short, long, value_name = "USERNAME")]
    pub user: Option<String>,

    /// Run a single scan and exit
    #[arg(short, long)]
    pub once: bool,

    /// Configuration file (default: config.toml, then config.example.toml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Validate and print the configuration, then exit
    #[arg(long)]
    pub check_config: bool,

    /// Enable verbose debug logging (default: level from config)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn run_mode(&self) -> RunMode {
        if self.once {
            RunMode::Once
        } else {
            RunMode::Repeating
        }
    }

    /// Target user without a leading `u/` and with blanks treated as unset
    pub fn target_user(&self) -> Option<String> {
        self.user
            .as_deref()
            .map(|user| user.trim().trim_start_matches("u/").to_string())
            .filter(|user| !user.is_empty())
    }
}
