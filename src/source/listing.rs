//! Reddit listing payloads and comment tree flattening

use chrono::DateTime;
use serde::Deserialize;
use tracing::debug;

use crate::models::CommentRecord;
use crate::models::Submission;

/// `{"kind": "Listing", "data": {...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<Thing>,
    pub after: Option<String>,
}

/// A tagged API object: `t1` comment, `t3` link, `more` placeholder
#[derive(Debug, Clone, Deserialize)]
pub struct Thing {
    pub kind: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Response of `/api/morechildren?api_type=json`
#[derive(Debug, Clone, Deserialize)]
pub struct MoreChildrenResponse {
    pub json: MoreChildrenJson,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoreChildrenJson {
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
    #[serde(default)]
    pub data: MoreChildrenData,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct MoreChildrenData {
    #[serde(default)]
    pub things: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
struct RawLink {
    id: String,
    #[serde(default)]
    title: String,
    created_utc: Option<f64>,
    #[serde(default)]
    num_comments: u64,
}

#[derive(Debug, Deserialize)]
struct RawComment {
    author: Option<String>,
    body: Option<String>,
    #[serde(default)]
    locked: bool,
    /// Either `""` or a nested listing
    #[serde(default)]
    replies: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct RawMore {
    #[serde(default)]
    children: Vec<String>,
    parent_id: Option<String>,
}

/// Comments found in a payload plus what is still hidden behind placeholders
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommentTree {
    pub comments: Vec<CommentRecord>,
    /// Comment ids to resolve through `/api/morechildren`
    pub more_ids: Vec<String>,
    /// Comments whose replies sit behind a "continue this thread" stub
    pub continue_parents: Vec<String>,
}

/// Submissions of a link listing, in listing order
pub fn parse_submissions(listing: Listing) -> Vec<Submission> {
    listing
        .data
        .children
        .into_iter()
        .filter(|thing| thing.kind == "t3")
        .filter_map(|thing| match serde_json::from_value::<RawLink>(thing.data) {
            Ok(raw) => Some(Submission {
                created_utc: raw
                    .created_utc
                    .and_then(|secs| DateTime::from_timestamp(secs as i64, 0)),
                id: raw.id,
                title: raw.title,
                num_comments: raw.num_comments,
            }),
            Err(e) => {
                debug!("Skipping malformed submission entry: {}", e);
                None
            }
        })
        .collect()
}

/// Walk comment things depth first, in display order
///
/// Malformed nodes are skipped. `more` placeholders contribute their child ids
/// to `tree.more_ids`. "Continue this thread" stubs carry no ids, so the parent
/// comment id goes to `tree.continue_parents` instead.
pub fn flatten_things(things: Vec<Thing>, container_title: &str, tree: &mut CommentTree) {
    for thing in things {
        match thing.kind.as_str() {
            "t1" => {
                let raw: RawComment = match serde_json::from_value(thing.data) {
                    Ok(raw) => raw,
                    Err(e) => {
                        debug!("Skipping malformed comment: {}", e);
                        continue;
                    }
                };
                tree.comments.push(CommentRecord {
                    author: raw.author,
                    body: raw.body,
                    is_locked: raw.locked,
                    container_title: container_title.to_string(),
                });
                flatten_replies(raw.replies, container_title, tree);
            }
            "more" => match serde_json::from_value::<RawMore>(thing.data) {
                Ok(more) => {
                    let ids: Vec<String> = more
                        .children
                        .into_iter()
                        .filter(|id| !id.is_empty() && id != "_")
                        .collect();
                    if !ids.is_empty() {
                        tree.more_ids.extend(ids);
                    } else if let Some(parent) =
                        more.parent_id.as_deref().and_then(|p| p.strip_prefix("t1_"))
                    {
                        tree.continue_parents.push(parent.to_string());
                    } else {
                        debug!("Dropping placeholder with nothing to expand");
                    }
                }
                Err(e) => debug!("Skipping malformed placeholder: {}", e),
            },
            other => debug!("Ignoring unexpected thing kind {}", other),
        }
    }
}

/// `replies` is either `""` or a nested listing
fn flatten_replies(replies: serde_json::Value, container_title: &str, tree: &mut CommentTree) {
    if !replies.is_object() {
        return;
    }
    match serde_json::from_value::<Listing>(replies) {
        Ok(replies) => flatten_things(replies.data.children, container_title, tree),
        Err(e) => debug!("Skipping malformed reply listing: {}", e),
    }
}

/// Flatten the comment half of a `/comments/{id}` response
///
/// The endpoint answers with two listings: the link itself, then its comments.
pub fn flatten_comment_page(page: Vec<Listing>, container_title: &str) -> CommentTree {
    let mut tree = CommentTree::default();
    if let Some(comments) = page.into_iter().nth(1) {
        flatten_things(comments.data.children, container_title, &mut tree);
    }
    tree
}

/// Flatten the replies of a `/comments/{id}/_/{comment}` response
///
/// The comment listing starts with the parent comment itself, which was
/// already taken from the page that held the stub. Only its replies are new.
pub fn flatten_continue_page(page: Vec<Listing>, container_title: &str) -> CommentTree {
    let mut tree = CommentTree::default();
    let parent = page
        .into_iter()
        .nth(1)
        .and_then(|listing| listing.data.children.into_iter().find(|thing| thing.kind == "t1"));
    let Some(parent) = parent else {
        return tree;
    };
    match serde_json::from_value::<RawComment>(parent.data) {
        Ok(raw) => flatten_replies(raw.replies, container_title, &mut tree),
        Err(e) => debug!("Skipping malformed continued comment: {}", e),
    }
    tree
}
