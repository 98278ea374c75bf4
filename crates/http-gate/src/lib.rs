//! HTTP reverse-proxy boundary for the pathgate project.
//!
//! This crate puts the [`path_rules::RuleEngine`] in front of an HTTP
//! handler chain.  Every inbound request passes through a [`PathFilter`],
//! which evaluates the request path and either forwards the request to the
//! configured [`NextHandler`] or answers 403 Forbidden without forwarding.
//!
//! # Architecture
//!
//! ```text
//! Client  <--HTTP-->  Gateway  <--HTTP-->  upstream service
//!                        |
//!                   [PathFilter]
//!                        |
//!                   [RuleEngine]
//! ```
//!
//! The [`Gateway`] accepts TCP connections and serves each one with
//! hyper's http1 connection driver.  [`ProxyUpstream`] is the stock next
//! handler: it rewrites the request URI to the upstream authority and
//! forwards the request verbatim.  Anything implementing [`NextHandler`]
//! can stand in for it, which is how the filter is tested.

pub mod filter;
pub mod listener;
pub mod upstream;

// Re-export the primary public types at the crate root for convenience.
pub use filter::{GateBody, NextHandler, PathFilter};
pub use listener::Gateway;
pub use upstream::ProxyUpstream;
