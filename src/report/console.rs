use std::io::Stdout;
use std::io::Write;

use tracing::warn;

use super::ReportSink;
use crate::cli::output::truncate_str;
use crate::errors::BotWatchError;
use crate::models::Finding;
use crate::models::Submission;

/// Titles longer than this are cut for display
pub const TITLE_DISPLAY_CHARS: usize = 80;

/// Human readable report lines, one per event
pub struct ConsoleSink<W: Write = Stdout> {
    out: W,
}

impl ConsoleSink<Stdout> {
    pub fn stdout() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            warn!("Failed to write report line: {}", e);
        }
    }
}

impl<W: Write> ReportSink for ConsoleSink<W> {
    fn submission_completed(&mut self, feed: &str, submission: &Submission) {
        let title = truncate_str(submission.title.trim(), TITLE_DISPLAY_CHARS);
        self.line(&format!("{feed}: Completed bot scanning of submission: {title}"));
    }

    fn submission_skipped(&mut self, feed: &str, submission: &Submission, error: &BotWatchError) {
        let title = truncate_str(submission.title.trim(), TITLE_DISPLAY_CHARS);
        self.line(&format!("{feed}: Skipped submission: {title} ({error})"));
    }

    fn findings(&mut self, findings: &[Finding]) {
        for finding in findings {
            self.line(&format!(
                "Possible bot found: u/{}: {} [Count = {}]",
                finding.author, finding.body, finding.count
            ));
        }
    }

    fn window_completed(&mut self, feed: &str, window_size: u32) {
        self.line(&format!(
            "{feed}: Completed bot scanning of most recent {window_size} submissions"
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::normalize;

    fn output(sink: ConsoleSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn test_finding_line_format() {
        let mut sink = ConsoleSink::new(Vec::new());
        sink.findings(&[Finding {
            author: "bot1".to_string(),
            body: normalize("Buy followers at example.com"),
            count: 6,
        }]);
        assert_eq!(
            output(sink),
            "Possible bot found: u/bot1: Buyfollowersatexamplecom [Count = 6]\n"
        );
    }

    #[test]
    fn test_submission_and_window_lines() {
        let mut sink = ConsoleSink::new(Vec::new());
        sink.submission_completed("r/rust", &Submission::new("a1", "Weekly thread"));
        sink.window_completed("r/rust", 25);
        assert_eq!(
            output(sink),
            "r/rust: Completed bot scanning of submission: Weekly thread\n\
             r/rust: Completed bot scanning of most recent 25 submissions\n"
        );
    }

    #[test]
    fn test_long_title_truncated() {
        let mut sink = ConsoleSink::new(Vec::new());
        let title = "x".repeat(120);
        sink.submission_completed("r/rust", &Submission::new("a1", title));
        let text = output(sink);
        assert!(text.ends_with(&format!("{}...\n", "x".repeat(TITLE_DISPLAY_CHARS))));
    }

    #[test]
    fn test_skipped_line_carries_reason() {
        let mut sink = ConsoleSink::new(Vec::new());
        sink.submission_skipped(
            "r/rust",
            &Submission::new("a1", "Gone"),
            &BotWatchError::RateLimited,
        );
        let text = output(sink);
        assert!(text.contains("Skipped submission: Gone"));
        assert!(text.contains("Rate limited"));
    }

    #[test]
    fn test_no_findings_prints_nothing() {
        let mut sink = ConsoleSink::new(Vec::new());
        sink.findings(&[]);
        assert!(output(sink).is_empty());
    }
}
