//! Path matchers.
//!
//! # Responsibilities
//! - Match a literal path exactly
//! - Match a literal prefix followed by a typed parameter slot
//! - Hand the raw parameter text to the route's extractor
//!
//! # Design Decisions
//! - Matching is case-sensitive and anchored at both ends
//! - No regex: each slot is a single pass over its character class
//! - Matchers only classify characters; numeric parsing belongs to the extractor

/// What a matcher captured from the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture<'a> {
    /// The route has no parameter slot.
    Bare,
    /// One or more ASCII digits.
    Digits(&'a str),
    /// One or more ASCII letters, digits or spaces.
    FilterText(&'a str),
}

/// Trait for matching a request path against a route pattern.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns the captured parameter if the whole path matches.
    fn capture<'a>(&self, path: &'a str) -> Option<Capture<'a>>;
}

/// Matches one literal path.
#[derive(Debug, Clone)]
pub struct ExactMatcher {
    path: String,
}

impl ExactMatcher {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Matcher for ExactMatcher {
    fn capture<'a>(&self, path: &'a str) -> Option<Capture<'a>> {
        (path == self.path).then_some(Capture::Bare)
    }
}

/// Matches `<prefix><digits>`.
#[derive(Debug, Clone)]
pub struct DigitsMatcher {
    prefix: String,
}

impl DigitsMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Matcher for DigitsMatcher {
    fn capture<'a>(&self, path: &'a str) -> Option<Capture<'a>> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        let valid = !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit());
        valid.then_some(Capture::Digits(rest))
    }
}

/// Matches `<prefix><letters, digits and spaces>`.
#[derive(Debug, Clone)]
pub struct FilterTextMatcher {
    prefix: String,
}

impl FilterTextMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Matcher for FilterTextMatcher {
    fn capture<'a>(&self, path: &'a str) -> Option<Capture<'a>> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        let valid = !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_alphanumeric() || b == b' ');
        valid.then_some(Capture::FilterText(rest))
    }
}
