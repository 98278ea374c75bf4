use regex::Regex;
use thiserror::Error;

/// A pattern string failed to compile as a regular expression.
///
/// Raised only at construction time; construction is all-or-nothing, so a
/// single bad pattern fails the entire set.
#[derive(Debug, Error)]
#[error("invalid path pattern '{pattern}'")]
pub struct InvalidPatternError {
    /// The offending pattern string, verbatim.
    pub pattern: String,
    /// The underlying regex syntax error.
    #[source]
    pub source: regex::Error,
}

/// An ordered set of pre-compiled path matchers.
///
/// Matching is existential: [`PatternSet::matches`] returns `true` as soon as
/// any pattern matches, scanning in input order.  The set is immutable after
/// construction; an empty set matches nothing.
#[derive(Debug, Default)]
pub struct PatternSet {
    matchers: Vec<Regex>,
}

impl PatternSet {
    /// Compile `patterns` into a set, preserving input order.
    ///
    /// Compilation is fail-fast: the first invalid pattern aborts with an
    /// [`InvalidPatternError`] and no partial set is built.  An empty input
    /// yields an empty set.
    pub fn compile(patterns: &[String]) -> Result<Self, InvalidPatternError> {
        let mut matchers = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let regex = Regex::new(pattern).map_err(|source| InvalidPatternError {
                pattern: pattern.clone(),
                source,
            })?;
            matchers.push(regex);
        }
        Ok(Self { matchers })
    }

    /// Returns `true` if any pattern matches anywhere within `path`.
    ///
    /// Patterns are unanchored: `/bar(.*)` matches `/foo/bar` because the
    /// substring `/bar` occurs inside the path.  Operators who want
    /// start-of-path matching anchor their patterns with `^` explicitly.
    pub fn matches(&self, path: &str) -> bool {
        self.matchers.iter().any(|re| re.is_match(path))
    }

    /// Number of compiled patterns in the set.
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    /// Returns `true` if the set contains no patterns.
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}
