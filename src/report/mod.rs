//! Report sinks
//!
//! The scanner tells a sink when a submission is done or skipped, hands it
//! findings, and announces the end of each window. What happens with those
//! messages (printing, collecting, alerting) is up to the sink.

pub mod console;
pub mod memory;

pub use console::ConsoleSink;
pub use memory::MemorySink;
pub use memory::ReportEvent;

use crate::errors::BotWatchError;
use crate::models::Finding;
use crate::models::Submission;

pub trait ReportSink {
    /// All comments of `submission` have been counted
    fn submission_completed(&mut self, feed: &str, submission: &Submission);

    /// `submission` could not be fetched and was left out of the pass
    fn submission_skipped(&mut self, feed: &str, submission: &Submission, error: &BotWatchError);

    /// Current findings, recomputed from the cumulative counters
    fn findings(&mut self, findings: &[Finding]);

    /// The whole window of `window_size` submissions has been processed
    fn window_completed(&mut self, feed: &str, window_size: u32);
}
