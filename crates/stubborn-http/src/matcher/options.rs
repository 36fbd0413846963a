//! Match options: which request fields decide that two requests are the same.

use crate::request::StubRequest;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Custom comparison between a candidate request and a stored one.
pub type CustomMatch = Arc<dyn Fn(&StubRequest, &StubRequest) -> bool + Send + Sync>;

/// A single matching criterion.
#[derive(Clone)]
pub enum Matcher {
    /// Path plus order-independent query parameters
    Url,
    /// Exact method string
    Method,
    /// Ordered, name-case-insensitive header list
    Headers,
    /// Byte-exact request body
    Body,
    /// Caller-supplied predicate; a `true` result overrides every other criterion
    Custom(CustomMatch),
}

impl Matcher {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&StubRequest, &StubRequest) -> bool + Send + Sync + 'static,
    {
        Matcher::Custom(Arc::new(f))
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Matcher::Custom(_))
    }

    fn same_kind(&self, other: &Matcher) -> bool {
        matches!(
            (self, other),
            (Matcher::Url, Matcher::Url)
                | (Matcher::Method, Matcher::Method)
                | (Matcher::Headers, Matcher::Headers)
                | (Matcher::Body, Matcher::Body)
        )
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Url => write!(f, "Url"),
            Matcher::Method => write!(f, "Method"),
            Matcher::Headers => write!(f, "Headers"),
            Matcher::Body => write!(f, "Body"),
            Matcher::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Serializable criterion name used in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchCriterion {
    Url,
    Method,
    Headers,
    Body,
}

impl From<MatchCriterion> for Matcher {
    fn from(criterion: MatchCriterion) -> Self {
        match criterion {
            MatchCriterion::Url => Matcher::Url,
            MatchCriterion::Method => Matcher::Method,
            MatchCriterion::Headers => Matcher::Headers,
            MatchCriterion::Body => Matcher::Body,
        }
    }
}

/// Ordered, non-empty set of matchers.
///
/// Built-in criteria appear at most once; custom predicates may repeat and are
/// evaluated in insertion order.
#[derive(Clone, Debug)]
pub struct MatchOptions {
    matchers: Vec<Matcher>,
}

impl MatchOptions {
    /// Options holding a single matcher.
    pub fn only(matcher: Matcher) -> Self {
        Self {
            matchers: vec![matcher],
        }
    }

    /// Url, method, headers and body must all match.
    pub fn strict() -> Self {
        Self::only(Matcher::Url)
            .and(Matcher::Method)
            .and(Matcher::Headers)
            .and(Matcher::Body)
    }

    pub fn url_only() -> Self {
        Self::only(Matcher::Url)
    }

    /// Add a matcher. Built-in criteria already present are ignored.
    pub fn and(mut self, matcher: Matcher) -> Self {
        if !self.matchers.iter().any(|m| m.same_kind(&matcher)) {
            self.matchers.push(matcher);
        }
        self
    }

    pub fn and_custom<F>(self, f: F) -> Self
    where
        F: Fn(&StubRequest, &StubRequest) -> bool + Send + Sync + 'static,
    {
        self.and(Matcher::custom(f))
    }

    /// Build options from configuration criteria. Returns `None` for an empty list.
    pub fn from_criteria(criteria: &[MatchCriterion]) -> Option<Self> {
        let (first, rest) = criteria.split_first()?;
        Some(
            rest.iter()
                .fold(Self::only((*first).into()), |opts, c| opts.and((*c).into())),
        )
    }

    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    pub fn custom_matchers(&self) -> impl Iterator<Item = &CustomMatch> {
        self.matchers.iter().filter_map(|m| match m {
            Matcher::Custom(f) => Some(f),
            _ => None,
        })
    }

    pub fn builtin_matchers(&self) -> impl Iterator<Item = &Matcher> {
        self.matchers.iter().filter(|m| !m.is_custom())
    }
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self::strict()
    }
}
