use super::ReportSink;
use crate::errors::BotWatchError;
use crate::models::Finding;
use crate::models::Submission;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    SubmissionCompleted { feed: String, title: String },
    SubmissionSkipped { feed: String, title: String, reason: String },
    Finding(Finding),
    WindowCompleted { feed: String, window_size: u32 },
}

/// Keeps every event in order
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub events: Vec<ReportEvent>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Findings reported after the most recent end-of-window notice
    pub fn final_findings(&self) -> Vec<Finding> {
        let start = self
            .events
            .iter()
            .rposition(|event| matches!(event, ReportEvent::WindowCompleted { .. }))
            .map_or(self.events.len(), |idx| idx + 1);
        self.events[start..]
            .iter()
            .filter_map(|event| match event {
                ReportEvent::Finding(finding) => Some(finding.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn finding_events(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, ReportEvent::Finding(_)))
            .count()
    }

    pub fn completed_titles(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ReportEvent::SubmissionCompleted { title, .. } => Some(title.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn skipped_titles(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ReportEvent::SubmissionSkipped { title, .. } => Some(title.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn windows_completed(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, ReportEvent::WindowCompleted { .. }))
            .count()
    }
}

impl ReportSink for MemorySink {
    fn submission_completed(&mut self, feed: &str, submission: &Submission) {
        self.events.push(ReportEvent::SubmissionCompleted {
            feed: feed.to_string(),
            title: submission.title.clone(),
        });
    }

    fn submission_skipped(&mut self, feed: &str, submission: &Submission, error: &BotWatchError) {
        self.events.push(ReportEvent::SubmissionSkipped {
            feed: feed.to_string(),
            title: submission.title.clone(),
            reason: error.to_string(),
        });
    }

    fn findings(&mut self, findings: &[Finding]) {
        self.events
            .extend(findings.iter().cloned().map(ReportEvent::Finding));
    }

    fn window_completed(&mut self, feed: &str, window_size: u32) {
        self.events.push(ReportEvent::WindowCompleted {
            feed: feed.to_string(),
            window_size,
        });
    }
}
