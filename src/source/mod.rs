//! Content sources
//!
//! A source yields the newest submissions of a feed and, for each one, its
//! fully expanded comment list. `RedditClient` talks to the Reddit API;
//! `MemorySource` serves canned data for tests and replays.

pub mod listing;
pub mod memory;
pub mod reddit;

pub use memory::MemorySource;
pub use reddit::RedditClient;

use crate::models::CommentRecord;
use crate::models::Submission;
use crate::Result;

/// Where submissions and their comments come from
#[allow(async_fn_in_trait)]
pub trait ContentSource {
    /// Human readable feed name used in reports, e.g. `r/rust`
    fn feed_name(&self) -> String;

    /// Up to `limit` submissions, newest first
    async fn fetch_window(&self, limit: u32) -> Result<Vec<Submission>>;

    /// Every comment of a submission, with no unexpanded placeholders left
    async fn fetch_comments(&self, submission: &Submission) -> Result<Vec<CommentRecord>>;
}
