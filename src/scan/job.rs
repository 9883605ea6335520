use tracing::debug;

use super::scanner::Scanner;
use crate::config::CounterPolicy;
use crate::detection::AuthorCounters;
use crate::models::ScanSummary;
use crate::report::ReportSink;
use crate::source::ContentSource;
use crate::Result;

/// Something the scheduler can run once per interval
#[allow(async_fn_in_trait)]
pub trait ScanJob {
    async fn run_pass(&mut self) -> Result<ScanSummary>;
}

/// A scanner together with the counters it fills
///
/// The counters belong to the job and are lent to one pass at a time. Under
/// `ResetEachPass` every pass starts from empty counters; under `Accumulate`
/// counts carry over for the lifetime of the process.
pub struct DetectionJob<S, K> {
    scanner: Scanner<S, K>,
    counters: AuthorCounters,
    policy: CounterPolicy,
}

impl<S: ContentSource, K: ReportSink> DetectionJob<S, K> {
    pub fn new(scanner: Scanner<S, K>, policy: CounterPolicy) -> Self {
        Self {
            scanner,
            counters: AuthorCounters::new(),
            policy,
        }
    }

    pub fn counters(&self) -> &AuthorCounters {
        &self.counters
    }

    pub fn scanner(&self) -> &Scanner<S, K> {
        &self.scanner
    }

    pub fn into_scanner(self) -> Scanner<S, K> {
        self.scanner
    }
}

impl<S: ContentSource, K: ReportSink> ScanJob for DetectionJob<S, K> {
    async fn run_pass(&mut self) -> Result<ScanSummary> {
        if self.policy == CounterPolicy::ResetEachPass {
            self.counters.clear();
        } else {
            debug!(
                "Continuing with {} counted comments from earlier passes",
                self.counters.total()
            );
        }
        self.scanner.run_scan(&mut self.counters).await
    }
}
