use std::collections::BTreeMap;

use crate::models::Finding;
use crate::models::NormalizedBody;

/// Per-author tally of normalized comment bodies
///
/// Counts only ever grow, and an entry exists only once it has been recorded
/// at least once. Iteration order is sorted by author, then body, which keeps
/// reports stable from run to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorCounters {
    by_author: BTreeMap<String, BTreeMap<NormalizedBody, u64>>,
}

impl AuthorCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more occurrence of `body` for `author`
    pub fn record(&mut self, author: &str, body: NormalizedBody) {
        *self
            .by_author
            .entry(author.to_string())
            .or_default()
            .entry(body)
            .or_insert(0) += 1;
    }

    /// Current count for a pair, zero if never recorded
    pub fn count(&self, author: &str, body: &NormalizedBody) -> u64 {
        self.by_author
            .get(author)
            .and_then(|bodies| bodies.get(body))
            .copied()
            .unwrap_or(0)
    }

    /// Every pair whose count is at or above `threshold`
    ///
    /// A pure read; calling it again without new records yields the same list.
    pub fn report(&self, threshold: u32) -> Vec<Finding> {
        let threshold = u64::from(threshold);
        self.iter()
            .filter(|(_, _, count)| *count >= threshold)
            .map(|(author, body, count)| Finding {
                author: author.to_string(),
                body: body.clone(),
                count,
            })
            .collect()
    }

    /// All (author, body, count) triples
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NormalizedBody, u64)> + '_ {
        self.by_author.iter().flat_map(|(author, bodies)| {
            bodies
                .iter()
                .map(move |(body, count)| (author.as_str(), body, *count))
        })
    }

    pub fn authors(&self) -> impl Iterator<Item = &str> + '_ {
        self.by_author.keys().map(String::as_str)
    }

    pub fn author_count(&self) -> usize {
        self.by_author.len()
    }

    /// Total number of recorded comments
    pub fn total(&self) -> u64 {
        self.iter().map(|(_, _, count)| count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_author.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_author.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::normalize;

    fn record_n(counters: &mut AuthorCounters, author: &str, text: &str, n: usize) {
        for _ in 0..n {
            counters.record(author, normalize(text));
        }
    }

    #[test]
    fn test_new_counters_are_empty() {
        let counters = AuthorCounters::new();
        assert!(counters.is_empty());
        assert_eq!(counters.total(), 0);
        assert!(counters.report(1).is_empty());
    }

    #[test]
    fn test_count_equals_number_of_records() {
        let mut counters = AuthorCounters::new();
        record_n(&mut counters, "bot1", "spam spam", 7);
        assert_eq!(counters.count("bot1", &normalize("spamspam")), 7);
    }

    #[test]
    fn test_bodies_counted_independently() {
        let mut counters = AuthorCounters::new();
        record_n(&mut counters, "alice", "first thing", 2);
        record_n(&mut counters, "alice", "second thing", 3);

        assert_eq!(counters.count("alice", &normalize("first thing")), 2);
        assert_eq!(counters.count("alice", &normalize("second thing")), 3);
        assert_eq!(counters.author_count(), 1);
        assert_eq!(counters.total(), 5);
    }

    #[test]
    fn test_authors_counted_independently() {
        let mut counters = AuthorCounters::new();
        record_n(&mut counters, "alice", "same text", 2);
        record_n(&mut counters, "bob", "same text", 4);

        assert_eq!(counters.count("alice", &normalize("same text")), 2);
        assert_eq!(counters.count("bob", &normalize("same text")), 4);
    }

    #[test]
    fn test_unrecorded_pair_has_no_entry() {
        let mut counters = AuthorCounters::new();
        record_n(&mut counters, "alice", "hello there", 1);

        assert_eq!(counters.count("bob", &normalize("hello there")), 0);
        assert_eq!(counters.authors().collect::<Vec<_>>(), vec!["alice"]);
        assert_eq!(counters.iter().count(), 1);
    }

    #[test]
    fn test_threshold_boundary() {
        let mut counters = AuthorCounters::new();
        let body = normalize("buy followers");

        record_n(&mut counters, "bot1", "buy followers", 4);
        assert!(counters.report(5).is_empty());

        counters.record("bot1", body.clone());
        assert_eq!(
            counters.report(5),
            vec![Finding {
                author: "bot1".to_string(),
                body: body.clone(),
                count: 5,
            }]
        );

        counters.record("bot1", body.clone());
        let findings = counters.report(5);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].count, 6);
    }

    #[test]
    fn test_report_is_idempotent() {
        let mut counters = AuthorCounters::new();
        record_n(&mut counters, "bot1", "promo code", 6);
        record_n(&mut counters, "bot2", "other promo", 9);

        let first = counters.report(5);
        let second = counters.report(5);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_report_order_is_sorted() {
        let mut counters = AuthorCounters::new();
        record_n(&mut counters, "zed", "bbb", 2);
        record_n(&mut counters, "amy", "zzz", 2);
        record_n(&mut counters, "amy", "aaa", 2);

        let order: Vec<(String, String)> = counters
            .report(2)
            .into_iter()
            .map(|f| (f.author, f.body.to_string()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("amy".to_string(), "aaa".to_string()),
                ("amy".to_string(), "zzz".to_string()),
                ("zed".to_string(), "bbb".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_body_is_counted() {
        let mut counters = AuthorCounters::new();
        record_n(&mut counters, "emoji_fan", "🔥🔥🔥", 5);

        let findings = counters.report(5);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].body.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut counters = AuthorCounters::new();
        record_n(&mut counters, "alice", "hi there", 3);
        counters.clear();
        assert!(counters.is_empty());
    }
}
