//! Filter predicates gating which results receive a document handle.
//!
//! A [`Filter`] is anything that can answer "does this header value match?".
//! Regular expressions are the common case; [`FnFilter`] wraps a closure for
//! anything the regex syntax cannot express. Header values can be absent, so the predicate
//! input is an `Option` and every implementation must decide what absence
//! means: the regex implementation treats it as a non-match, [`AcceptAll`]
//! matches regardless.
//!
//! Status codes are tested against their decimal string form, so a filter of
//! `^2` accepts any 2xx response.

use once_cell::sync::Lazy;
use regex::Regex;

/// Pattern matched by the default content-type filter.
pub const DEFAULT_CONTENT_TYPE_PATTERN: &str = "html|xml";

static DEFAULT_CONTENT_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_CONTENT_TYPE_PATTERN).expect("static pattern is valid"));

/// A boolean predicate over an optional header value.
pub trait Filter: Send + Sync {
    /// Returns whether the value passes the filter.
    fn test(&self, value: Option<&str>) -> bool;
}

impl Filter for Regex {
    fn test(&self, value: Option<&str>) -> bool {
        value.is_some_and(|v| self.is_match(v))
    }
}

/// Adapts a closure into a [`Filter`].
pub struct FnFilter<F>(pub F);

impl<F> Filter for FnFilter<F>
where
    F: Fn(Option<&str>) -> bool + Send + Sync,
{
    fn test(&self, value: Option<&str>) -> bool {
        (self.0)(value)
    }
}

/// A filter that passes everything, including absent values.
///
/// The default status-code filter.
pub struct AcceptAll;

impl Filter for AcceptAll {
    fn test(&self, _value: Option<&str>) -> bool {
        true
    }
}

/// The default content-type filter: matches `html` or `xml` anywhere in the
/// header value, rejects an absent header.
pub fn default_content_type_filter() -> Regex {
    DEFAULT_CONTENT_TYPE.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_content_type_matches_html_and_xml() {
        let filter = default_content_type_filter();
        assert!(filter.test(Some("text/html; charset=utf-8")));
        assert!(filter.test(Some("application/xml")));
        assert!(filter.test(Some("application/xhtml+xml")));
        assert!(!filter.test(Some("application/json")));
    }

    #[test]
    fn regex_filter_rejects_absent_value() {
        let filter = default_content_type_filter();
        assert!(!filter.test(None));
    }

    #[test]
    fn accept_all_passes_absent_value() {
        assert!(AcceptAll.test(None));
        assert!(AcceptAll.test(Some("anything")));
    }

    #[test]
    fn status_prefix_filter_matches_string_form() {
        let only_2xx = Regex::new("^2").expect("pattern");
        assert!(only_2xx.test(Some("200")));
        assert!(only_2xx.test(Some("204")));
        assert!(!only_2xx.test(Some("500")));
    }

    #[test]
    fn closures_act_as_filters() {
        let filter = FnFilter(|value: Option<&str>| value.is_some_and(|v| v.ends_with("html")));
        assert!(filter.test(Some("text/html")));
        assert!(!filter.test(Some("text/plain")));
        assert!(!filter.test(None));
    }
}
