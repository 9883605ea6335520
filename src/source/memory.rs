use std::collections::HashMap;
use std::collections::HashSet;

use super::ContentSource;
use crate::errors::BotWatchError;
use crate::models::CommentRecord;
use crate::models::Submission;
use crate::Result;

/// In-memory feed, newest submission first
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    name: String,
    submissions: Vec<Submission>,
    comments: HashMap<String, Vec<CommentRecord>>,
    failing: HashSet<String>,
    window_unavailable: bool,
}

impl MemorySource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append a submission (older than the ones already added)
    pub fn with_submission(mut self, submission: Submission, comments: Vec<CommentRecord>) -> Self {
        let comments = comments
            .into_iter()
            .map(|mut comment| {
                comment.container_title = submission.title.clone();
                comment
            })
            .collect();
        self.comments.insert(submission.id.clone(), comments);
        self.submissions.push(submission);
        self
    }

    /// Make fetching this submission's comments fail
    pub fn with_failing_submission(mut self, submission: Submission) -> Self {
        self.failing.insert(submission.id.clone());
        self.submissions.push(submission);
        self
    }

    /// Make fetching the window itself fail
    pub fn with_window_unavailable(mut self) -> Self {
        self.window_unavailable = true;
        self
    }
}

impl ContentSource for MemorySource {
    fn feed_name(&self) -> String {
        self.name.clone()
    }

    async fn fetch_window(&self, limit: u32) -> Result<Vec<Submission>> {
        if self.window_unavailable {
            return Err(BotWatchError::Api {
                status: 503,
                message: format!("{} is unavailable", self.name),
            });
        }
        Ok(self
            .submissions
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn fetch_comments(&self, submission: &Submission) -> Result<Vec<CommentRecord>> {
        if self.failing.contains(&submission.id) {
            return Err(BotWatchError::RateLimited);
        }
        self.comments.get(&submission.id).cloned().ok_or_else(|| {
            BotWatchError::Api {
                status: 404,
                message: format!("submission {} not found", submission.id),
            }
        })
    }
}
