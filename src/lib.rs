pub mod cli;
pub mod config;
pub mod detection;
pub mod errors;
pub mod logging;
pub mod models;
pub mod report;
pub mod scan;
pub mod source;


pub use config::AppConfig;
pub use errors::*;
