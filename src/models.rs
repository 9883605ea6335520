use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// A top-level discussion thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Base36 id, e.g. `abc123`
    pub id: String,
    pub title: String,
    pub created_utc: Option<DateTime<Utc>>,
    pub num_comments: u64,
}

impl Submission {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            created_utc: None,
            num_comments: 0,
        }
    }

    /// Fullname used by the API to reference this link (`t3_<id>`)
    pub fn fullname(&self) -> String {
        format!("t3_{}", self.id)
    }
}

/// One reply within a submission, as handed over by a content source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    /// `None` for deleted accounts
    pub author: Option<String>,
    /// `None` when the payload carried no body
    pub body: Option<String>,
    pub is_locked: bool,
    pub container_title: String,
}

impl CommentRecord {
    pub fn new(author: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
            body: Some(body.into()),
            is_locked: false,
            container_title: String::new(),
        }
    }
}

/// Comment text reduced to the key used for duplicate counting
///
/// Deserialized text is normalized again, so a stored body can never hold
/// anything but ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String")]
pub struct NormalizedBody(String);

impl From<String> for NormalizedBody {
    fn from(raw: String) -> Self {
        crate::detection::normalize(&raw)
    }
}

impl NormalizedBody {
    pub(crate) fn from_normalized(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NormalizedBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedBody {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An (author, body) pair whose repetition count reached the threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub author: String,
    pub body: NormalizedBody,
    pub count: u64,
}

/// Outcome of one pass over a window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub window_size: u32,
    pub submissions_scanned: u64,
    pub submissions_skipped: u64,
    pub comments_seen: u64,
    pub comments_counted: u64,
    pub findings: Vec<Finding>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_body_deserializes_through_normalize() {
        let body: NormalizedBody = serde_json::from_str(r#""Buy 100 followers!""#).unwrap();
        assert_eq!(body.as_str(), "Buyfollowers");
    }

    #[test]
    fn test_finding_serde_keeps_normalized_body() {
        let finding = Finding {
            author: "bot1".to_string(),
            body: crate::detection::normalize("buy followers @ example.com"),
            count: 6,
        };
        let json = serde_json::to_string(&finding).unwrap();
        assert!(json.contains(r#""body":"buyfollowersexamplecom""#));
        assert_eq!(serde_json::from_str::<Finding>(&json).unwrap(), finding);
    }
}
