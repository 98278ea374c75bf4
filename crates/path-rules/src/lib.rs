//! # path-rules
//!
//! Core filtering logic for the pathgate proxy.  This crate loads YAML rule
//! files, pre-compiles the block and allow regex patterns, and evaluates
//! request paths against them to produce an admit/reject verdict.
//!
//! ## Quick start
//!
//! ```rust
//! use path_rules::{Decision, RuleConfig, RuleEngine};
//!
//! let config = RuleConfig {
//!     block: vec!["^/wp-admin(.*)".to_string()],
//!     allow: vec!["^/wp-admin/admin-ajax\\.php(.*)".to_string()],
//! };
//! let engine = RuleEngine::new(config).unwrap();
//! assert_eq!(engine.evaluate("/wp-admin/settings"), Decision::Reject);
//! assert_eq!(engine.evaluate("/wp-admin/admin-ajax.php"), Decision::Admit);
//! ```

mod compiler;
mod decision;
mod engine;
pub mod loader;
mod schema;

// Re-export primary public API at crate root.
pub use compiler::{InvalidPatternError, PatternSet};
pub use decision::Decision;
pub use engine::RuleEngine;
pub use schema::RuleConfig;
