use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::config::AppConfig;
use crate::config::ReportCadence;
use crate::detection::is_eligible;
use crate::detection::normalize;
use crate::detection::AuthorCounters;
use crate::models::CommentRecord;
use crate::models::ScanSummary;
use crate::report::ReportSink;
use crate::source::ContentSource;
use crate::Result;

/// Parameters of one pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Submissions examined per pass
    pub window_size: u32,
    /// Minimum count for a finding
    pub threshold: u32,
    /// Count only this author's comments
    pub target_author: Option<String>,
    pub cadence: ReportCadence,
}

impl ScanOptions {
    pub fn from_config(config: &AppConfig, target_author: Option<String>) -> Self {
        Self {
            window_size: config.submission_limit(),
            threshold: config.duplicate_threshold(),
            target_author,
            cadence: config.scan.report_cadence,
        }
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            window_size: 25,
            threshold: crate::config::default_duplicate_threshold(),
            target_author: None,
            cadence: ReportCadence::default(),
        }
    }
}

/// Drives one pass over a window: fetch, filter, normalize, count, report
pub struct Scanner<S, K> {
    source: S,
    sink: K,
    options: ScanOptions,
}

impl<S: ContentSource, K: ReportSink> Scanner<S, K> {
    pub fn new(source: S, sink: K, options: ScanOptions) -> Self {
        Self {
            source,
            sink,
            options,
        }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn into_sink(self) -> K {
        self.sink
    }

    /// Author to count the record under, or `None` if the record is skipped
    fn counted_author<'r>(&self, record: &'r CommentRecord) -> Option<&'r str> {
        if !is_eligible(record) {
            return None;
        }
        let author = record.author.as_deref()?;
        match self.options.target_author.as_deref() {
            Some(target) if target != author => None,
            _ => Some(author),
        }
    }

    /// Count every eligible, in-scope comment; returns how many were counted
    pub fn count_comments(&self, counters: &mut AuthorCounters, comments: &[CommentRecord]) -> u64 {
        let mut counted = 0;
        for record in comments {
            let Some(author) = self.counted_author(record) else {
                continue;
            };
            let Some(body) = record.body.as_deref() else {
                continue;
            };
            counters.record(author, normalize(body));
            counted += 1;
        }
        counted
    }

    /// Run one pass over the newest `window_size` submissions
    ///
    /// A submission whose comments cannot be fetched is reported as skipped
    /// and the pass moves on. Only failing to fetch the window itself fails
    /// the pass.
    pub async fn run_scan(&mut self, counters: &mut AuthorCounters) -> Result<ScanSummary> {
        let feed = self.source.feed_name();
        let window_size = self.options.window_size;
        let threshold = self.options.threshold;

        let window = self.source.fetch_window(window_size).await?;
        info!(
            "{}: scanning {} submissions (threshold {}{})",
            feed,
            window.len(),
            threshold,
            self.options
                .target_author
                .as_deref()
                .map(|author| format!(", only u/{author}"))
                .unwrap_or_default()
        );

        let mut summary = ScanSummary {
            window_size,
            ..ScanSummary::default()
        };

        for submission in window.iter().take(window_size as usize) {
            let comments = match self.source.fetch_comments(submission).await {
                Ok(comments) => comments,
                Err(e) => {
                    if e.is_transient() {
                        warn!("{}: skipping submission {}: {}", feed, submission.id, e);
                    } else {
                        error!("{}: skipping submission {}: {}", feed, submission.id, e);
                    }
                    summary.submissions_skipped += 1;
                    self.sink.submission_skipped(&feed, submission, &e);
                    continue;
                }
            };

            let counted = self.count_comments(counters, &comments);
            debug!(
                "{}: {} of {} comments counted in {}",
                feed,
                counted,
                comments.len(),
                submission.id
            );
            summary.comments_seen += comments.len() as u64;
            summary.comments_counted += counted;
            summary.submissions_scanned += 1;

            self.sink.submission_completed(&feed, submission);
            if self.options.cadence == ReportCadence::Cumulative {
                self.sink.findings(&counters.report(threshold));
            }
        }

        let findings = counters.report(threshold);
        self.sink.window_completed(&feed, window_size);
        self.sink.findings(&findings);

        info!(
            "{}: pass finished, {} scanned, {} skipped, {} of {} comments counted, {} findings",
            feed,
            summary.submissions_scanned,
            summary.submissions_skipped,
            summary.comments_counted,
            summary.comments_seen,
            findings.len()
        );
        summary.findings = findings;
        Ok(summary)
    }
}
