use tracing::{debug, trace};

use crate::compiler::{InvalidPatternError, PatternSet};
use crate::decision::Decision;
use crate::schema::RuleConfig;

/// The path-filtering decision engine.
///
/// Holds two pre-compiled [`PatternSet`]s: the block set and the allow set
/// (which may be empty).  Construct via [`RuleEngine::new`], which compiles
/// every pattern eagerly; evaluation itself cannot fail.
///
/// The engine is immutable after construction and safe to share behind an
/// `Arc` across any number of concurrent request tasks.  A configuration
/// change must build a new engine and swap the shared reference; compiled
/// sets are never edited in place.
pub struct RuleEngine {
    block: PatternSet,
    allow: PatternSet,
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("block_patterns", &self.block.len())
            .field("allow_patterns", &self.allow.len())
            .finish()
    }
}

impl RuleEngine {
    /// Build an engine from a [`RuleConfig`].
    ///
    /// All patterns are compiled up front.  Returns [`InvalidPatternError`]
    /// on the first pattern that fails to compile; the caller must treat
    /// this as a fatal configuration error and refuse to serve.
    pub fn new(config: RuleConfig) -> Result<Self, InvalidPatternError> {
        let block = PatternSet::compile(&config.block)?;
        let allow = PatternSet::compile(&config.allow)?;
        Ok(Self { block, allow })
    }

    /// Evaluate a request path against the block and allow sets.
    ///
    /// Evaluation order:
    ///
    /// 1. An empty block set admits every path immediately.
    /// 2. The block set is scanned in order, stopping at the first match.
    /// 3. A blocked path is then tested against the allow set; the first
    ///    allow match rescues it.  The allow set is never consulted for
    ///    paths the block set did not match, so allow patterns can only
    ///    rescue, never reject.
    ///
    /// Matching is unanchored substring matching, exactly as operators
    /// wrote their patterns (see [`PatternSet::matches`]).  This method is
    /// total: it has no failure mode and no side effects.
    pub fn evaluate(&self, path: &str) -> Decision {
        if self.block.is_empty() {
            return Decision::Admit;
        }

        if !self.block.matches(path) {
            trace!(path, "no block pattern matched");
            return Decision::Admit;
        }

        // Provisionally blocked; the allow set gets a chance to rescue.
        if self.allow.matches(path) {
            debug!(path, "blocked path rescued by allow pattern");
            return Decision::Admit;
        }

        debug!(path, "path rejected by block pattern");
        Decision::Reject
    }
}
