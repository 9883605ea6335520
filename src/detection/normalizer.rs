use crate::models::NormalizedBody;

/// Strip everything except ASCII letters.
///
/// Case and letter order are kept, so `"a1!b 2C"` becomes `"abC"`. Input with
/// no letters yields the empty body, which is counted like any other.
pub fn normalize(raw: &str) -> NormalizedBody {
    NormalizedBody::from_normalized(raw.chars().filter(char::is_ascii_alphabetic).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_letters_in_order_and_case() {
        assert_eq!(normalize("a1!b 2C").as_str(), "abC");
    }

    #[test]
    fn test_strips_punctuation_whitespace_and_digits() {
        assert_eq!(
            normalize("Buy followers at example.com!!! 100% legit\n").as_str(),
            "Buyfollowersatexamplecomlegit"
        );
    }

    #[test]
    fn test_strips_emoji_and_non_ascii_letters() {
        assert_eq!(normalize("héllo 🚀 wörld").as_str(), "hllowrld");
    }

    #[test]
    fn test_no_letters_is_empty() {
        assert!(normalize("12345 !!! 🙂").is_empty());
        assert!(normalize("").is_empty());
    }

    #[test]
    fn test_formatting_variants_collide() {
        let a = normalize("**Check out my profile!**");
        let b = normalize("Check out my profile");
        let c = normalize("Check  out\nmy profile :)");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_case_is_not_folded() {
        assert_ne!(normalize("Hello"), normalize("hello"));
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "",
            "a",
            "a1!b 2C",
            "   leading and trailing   ",
            "markdown [link](https://example.com) *bold*",
            "日本語 mixed with ASCII",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(once.as_str()), once, "input: {input:?}");
        }
    }
}
