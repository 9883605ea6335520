//! Reddit API client
//!
//! Authenticates with the OAuth2 password grant (script apps) and reads the
//! `new` listing of one subreddit plus fully expanded comment trees.

use std::collections::HashSet;
use std::collections::VecDeque;
use std::time::Duration;
use std::time::Instant;

use reqwest::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;
use tracing::info;
use url::Url;

use super::listing::flatten_comment_page;
use super::listing::flatten_continue_page;
use super::listing::flatten_things;
use super::listing::parse_submissions;
use super::listing::CommentTree;
use super::listing::Listing;
use super::listing::MoreChildrenResponse;
use super::ContentSource;
use crate::config::AppConfig;
use crate::config::RedditConfig;
use crate::errors::BotWatchError;
use crate::models::CommentRecord;
use crate::models::Submission;
use crate::Result;

/// Items per listing page (API maximum)
const LISTING_PAGE_LIMIT: usize = 100;
/// Ids per `/api/morechildren` request (API maximum)
const MORE_CHILDREN_BATCH: usize = 100;
/// Comments requested per `/comments/{id}` call (API maximum)
const COMMENT_PAGE_LIMIT: u32 = 500;
/// Refresh the bearer token this long before it expires
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
    error: Option<String>,
}

/// Reddit client bound to one subreddit
pub struct RedditClient {
    http: Client,
    credentials: RedditConfig,
    api_base: Url,
    auth_url: Url,
    subreddit: String,
    token: Mutex<Option<AccessToken>>,
}

impl RedditClient {
    /// Create a new Reddit client
    pub fn new(credentials: RedditConfig, subreddit: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(credentials.user_agent.clone())
            .timeout(timeout)
            .build()?;

        // Url::join drops the last path segment unless the base ends in '/'
        let mut base = credentials.api_base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let api_base = Url::parse(&base)?;
        let auth_url = Url::parse(&credentials.auth_url)?;

        Ok(Self {
            http,
            credentials,
            api_base,
            auth_url,
            subreddit: subreddit.trim().trim_start_matches("r/").to_string(),
            token: Mutex::new(None),
        })
    }

    /// Create a new Reddit client from AppConfig
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.reddit.clone(),
            config.target_subreddit(),
            config.request_timeout(),
        )
    }

    pub fn subreddit(&self) -> &str {
        &self.subreddit
    }

    /// Return a valid bearer token, logging in again when needed
    async fn bearer_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() + TOKEN_REFRESH_MARGIN < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        debug!("Requesting Reddit access token for u/{}", self.credentials.username);
        let response = self
            .http
            .post(self.auth_url.clone())
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[
                ("grant_type", "password"),
                ("username", self.credentials.username.as_str()),
                ("password", self.credentials.password.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BotWatchError::Auth(format!(
                "token endpoint returned HTTP {status}"
            )));
        }

        let body: TokenResponse = response.json().await?;
        if let Some(error) = body.error {
            return Err(BotWatchError::Auth(error));
        }
        let value = body
            .access_token
            .ok_or_else(|| BotWatchError::Auth("response carried no access_token".to_string()))?;
        let lifetime = Duration::from_secs(body.expires_in.unwrap_or(3600));

        info!("Authenticated with Reddit as u/{}", self.credentials.username);
        *cached = Some(AccessToken {
            value: value.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(value)
    }

    /// GET a path relative to the API base and decode the JSON body
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let token = self.bearer_token().await?;
        let url = self.api_base.join(path)?;

        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(BotWatchError::RateLimited);
        }
        if status == StatusCode::UNAUTHORIZED {
            // Token revoked or expired early; log in again next time
            *self.token.lock().await = None;
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BotWatchError::Api {
                status: status.as_u16(),
                message: crate::cli::truncate_str(&message, 200),
            });
        }

        Ok(response.json().await?)
    }

    /// Resolve every `more` placeholder until none are left
    ///
    /// `requested` spans the whole submission so no id is asked for twice.
    async fn expand_more(
        &self,
        submission: &Submission,
        tree: &mut CommentTree,
        requested: &mut HashSet<String>,
    ) -> Result<()> {
        let mut pending: VecDeque<String> = tree.more_ids.drain(..).collect();

        while !pending.is_empty() {
            let mut batch = Vec::with_capacity(MORE_CHILDREN_BATCH);
            while batch.len() < MORE_CHILDREN_BATCH {
                let Some(id) = pending.pop_front() else {
                    break;
                };
                if requested.insert(id.clone()) {
                    batch.push(id);
                }
            }
            if batch.is_empty() {
                break;
            }

            debug!(
                "Expanding {} hidden comments of {}",
                batch.len(),
                submission.fullname()
            );
            let response: MoreChildrenResponse = self
                .get_json(
                    "api/morechildren",
                    &[
                        ("api_type", "json".to_string()),
                        ("link_id", submission.fullname()),
                        ("children", batch.join(",")),
                        ("limit_children", "false".to_string()),
                        ("raw_json", "1".to_string()),
                    ],
                )
                .await?;
            if !response.json.errors.is_empty() {
                return Err(BotWatchError::Custom(format!(
                    "morechildren failed for {}: {:?}",
                    submission.fullname(),
                    response.json.errors
                )));
            }

            let mut expanded = CommentTree::default();
            flatten_things(response.json.data.things, &submission.title, &mut expanded);
            tree.comments.extend(expanded.comments);
            tree.continue_parents.extend(expanded.continue_parents);
            pending.extend(expanded.more_ids);
        }

        Ok(())
    }

    /// Load the replies hidden behind a "continue this thread" stub
    async fn continue_thread(&self, submission: &Submission, parent: &str) -> Result<CommentTree> {
        debug!(
            "Continuing thread below t1_{} of {}",
            parent,
            submission.fullname()
        );
        let path = format!("comments/{}/_/{}", submission.id, parent);
        let page: Vec<Listing> = self
            .get_json(
                &path,
                &[
                    ("limit", COMMENT_PAGE_LIMIT.to_string()),
                    ("raw_json", "1".to_string()),
                ],
            )
            .await?;
        Ok(flatten_continue_page(page, &submission.title))
    }
}

impl ContentSource for RedditClient {
    fn feed_name(&self) -> String {
        format!("r/{}", self.subreddit)
    }

    async fn fetch_window(&self, limit: u32) -> Result<Vec<Submission>> {
        let path = format!("r/{}/new", self.subreddit);
        let wanted = limit as usize;
        let mut submissions: Vec<Submission> = Vec::with_capacity(wanted);
        let mut after: Option<String> = None;

        while submissions.len() < wanted {
            let page_limit = (wanted - submissions.len()).min(LISTING_PAGE_LIMIT);
            let mut query = vec![
                ("limit", page_limit.to_string()),
                ("raw_json", "1".to_string()),
            ];
            if let Some(cursor) = &after {
                query.push(("after", cursor.clone()));
            }

            let listing: Listing = self.get_json(&path, &query).await?;
            after = listing.data.after.clone();
            let page = parse_submissions(listing);
            if page.is_empty() {
                break;
            }
            submissions.extend(page);
            if after.is_none() {
                break;
            }
        }

        submissions.truncate(wanted);
        debug!("Fetched {} submissions from r/{}", submissions.len(), self.subreddit);
        Ok(submissions)
    }

    async fn fetch_comments(&self, submission: &Submission) -> Result<Vec<CommentRecord>> {
        let path = format!("comments/{}", submission.id);
        let page: Vec<Listing> = self
            .get_json(
                &path,
                &[
                    ("limit", COMMENT_PAGE_LIMIT.to_string()),
                    ("raw_json", "1".to_string()),
                ],
            )
            .await?;

        let mut tree = flatten_comment_page(page, &submission.title);
        let mut requested = HashSet::new();
        let mut continued = HashSet::new();
        loop {
            if !tree.more_ids.is_empty() {
                self.expand_more(submission, &mut tree, &mut requested).await?;
            }
            let Some(parent) = tree.continue_parents.pop() else {
                break;
            };
            if !continued.insert(parent.clone()) {
                continue;
            }
            let branch = self.continue_thread(submission, &parent).await?;
            tree.comments.extend(branch.comments);
            tree.more_ids.extend(branch.more_ids);
            tree.continue_parents.extend(branch.continue_parents);
        }
        debug!(
            "Fetched {} comments for {}",
            tree.comments.len(),
            submission.fullname()
        );
        Ok(tree.comments)
    }
}
