//! Request matching for stub playback.
//!
//! Two requests are "the same" when a custom matcher says so, or when every
//! built-in criterion in the [`MatchOptions`] holds.
//!
//! # Module Structure
//!
//! - `options` - Matcher enum and option sets
//! - `criteria` - Url, method, header and body comparisons

mod criteria;
mod options;

pub use criteria::{body_matches, headers_match, method_matches, sorted_query_pairs, url_matches};
pub use options::{CustomMatch, MatchCriterion, MatchOptions, Matcher};

use crate::request::StubRequest;

/// Decide whether `a` and `b` are equivalent under `options`.
pub fn matches(a: &StubRequest, b: &StubRequest, options: &MatchOptions) -> bool {
    if options.custom_matchers().any(|custom| custom(a, b)) {
        return true;
    }

    options.builtin_matchers().all(|matcher| match matcher {
        Matcher::Url => url_matches(a, b),
        Matcher::Method => method_matches(a, b),
        Matcher::Headers => headers_match(a, b),
        Matcher::Body => body_matches(a, b),
        Matcher::Custom(_) => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> StubRequest {
        StubRequest::get("https://elbedev.com").unwrap()
    }

    #[test]
    fn test_duplicate_headers_in_same_order_match() {
        let a = request()
            .with_header("abc", "alphabet")
            .with_header("abc", "алфавит");
        let b = request()
            .with_header("abc", "alphabet")
            .with_header("abc", "алфавит");
        assert!(matches(&a, &b, &MatchOptions::strict()));
    }

    #[test]
    fn test_duplicate_headers_in_different_order_do_not_match() {
        let a = request()
            .with_header("abc", "alphabet")
            .with_header("abc", "алфавит");
        let b = request()
            .with_header("abc", "алфавит")
            .with_header("abc", "alphabet");
        assert!(!matches(&a, &b, &MatchOptions::strict()));
    }

    #[test]
    fn test_extra_header_value_does_not_match() {
        let a = request()
            .with_header("ABC", "alphabet")
            .with_header("ABC", "алфавит");
        let b = request().with_header("abc", "alphabet");
        assert!(!matches(&a, &b, &MatchOptions::strict()));
    }

    #[test]
    fn test_equal_bodies_match() {
        let a = request().with_body("🐡");
        let b = request().with_body("🐡");
        assert!(matches(&a, &b, &MatchOptions::strict()));
    }

    #[test]
    fn test_different_bodies_do_not_match() {
        let a = request().with_body("🍏");
        let b = request().with_body("🍐");
        assert!(!matches(&a, &b, &MatchOptions::strict()));
    }

    #[test]
    fn test_url_only_ignores_method() {
        let a = StubRequest::get("https://api.example.com/x").unwrap();
        let b = StubRequest::post("https://api.example.com/x").unwrap();
        assert!(matches(&a, &b, &MatchOptions::url_only()));
        assert!(!matches(&a, &b, &MatchOptions::strict()));
    }

    #[test]
    fn test_custom_match_overrides_everything() {
        let a = StubRequest::get("https://api.example.com/a").unwrap();
        let b = StubRequest::post("https://api.example.com/b").unwrap();
        let options = MatchOptions::strict().and_custom(|_, _| true);
        assert!(matches(&a, &b, &options));
    }

    #[test]
    fn test_false_custom_does_not_block_builtin_match() {
        let a = StubRequest::get("https://api.example.com/a").unwrap();
        let options = MatchOptions::strict().and_custom(|_, _| false);
        assert!(matches(&a, &a.clone(), &options));
    }

    #[test]
    fn test_any_true_custom_wins() {
        let a = StubRequest::get("https://api.example.com/a").unwrap();
        let b = StubRequest::get("https://api.example.com/b").unwrap();
        let options = MatchOptions::url_only()
            .and_custom(|_, _| false)
            .and_custom(|x, y| x.method == y.method);
        assert!(matches(&a, &b, &options));
    }

    #[test]
    fn test_only_false_customs_is_vacuously_true() {
        let a = StubRequest::get("https://api.example.com/a").unwrap();
        let b = StubRequest::post("https://api.example.com/b").unwrap();
        let options = MatchOptions::only(Matcher::custom(|_, _| false));
        assert!(matches(&a, &b, &options));
    }
}
