use crate::models::CommentRecord;

/// Placeholders the platform substitutes for deleted or removed content
pub const REMOVED_SENTINELS: [&str; 2] = ["[deleted]", "[removed]"];

fn is_sentinel(value: &str) -> bool {
    REMOVED_SENTINELS.contains(&value)
}

/// Decide whether a comment should be counted at all
pub fn is_eligible(record: &CommentRecord) -> bool {
    let Some(author) = record.author.as_deref() else {
        return false;
    };
    let Some(body) = record.body.as_deref() else {
        return false;
    };

    !record.is_locked && !is_sentinel(author) && !is_sentinel(body) && body.chars().count() > 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_comment_is_eligible() {
        assert!(is_eligible(&CommentRecord::new("alice", "nice post")));
    }

    #[test]
    fn test_missing_author_excluded() {
        let mut record = CommentRecord::new("alice", "nice post");
        record.author = None;
        assert!(!is_eligible(&record));
    }

    #[test]
    fn test_missing_body_excluded() {
        let mut record = CommentRecord::new("alice", "nice post");
        record.body = None;
        assert!(!is_eligible(&record));
    }

    #[test]
    fn test_locked_excluded() {
        let mut record = CommentRecord::new("alice", "nice post");
        record.is_locked = true;
        assert!(!is_eligible(&record));
    }

    #[test]
    fn test_sentinel_author_excluded() {
        assert!(!is_eligible(&CommentRecord::new("[deleted]", "nice post")));
        assert!(!is_eligible(&CommentRecord::new("[removed]", "nice post")));
    }

    #[test]
    fn test_sentinel_body_excluded() {
        assert!(!is_eligible(&CommentRecord::new("alice", "[deleted]")));
        assert!(!is_eligible(&CommentRecord::new("alice", "[removed]")));
    }

    #[test]
    fn test_sentinel_must_match_exactly() {
        assert!(is_eligible(&CommentRecord::new("alice", "[deleted] lol")));
    }

    #[test]
    fn test_short_bodies_excluded() {
        assert!(!is_eligible(&CommentRecord::new("alice", "")));
        assert!(!is_eligible(&CommentRecord::new("alice", "k")));
        assert!(is_eligible(&CommentRecord::new("alice", "ok")));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // One emoji is four bytes but a single character
        assert!(!is_eligible(&CommentRecord::new("alice", "👍")));
        assert!(is_eligible(&CommentRecord::new("alice", "👍👍")));
    }

    #[test]
    fn test_body_without_letters_still_eligible() {
        assert!(is_eligible(&CommentRecord::new("alice", "!!")));
    }
}
