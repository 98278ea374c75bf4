use std::sync::Arc;

use bytes::Bytes;
use futures_util::future::BoxFuture;
use http_body_util::{combinators::BoxBody, BodyExt, Full};
use hyper::{Request, Response, StatusCode};
use tracing::debug;

use path_rules::{Decision, RuleEngine};

/// Response body type used throughout the gate.
pub type GateBody = BoxBody<Bytes, hyper::Error>;

/// The downstream consumer of admitted requests.
///
/// One operation: process this request.  Implementations receive the
/// original request unmodified and produce the response that goes back to
/// the client.  The stock implementation is
/// [`ProxyUpstream`](crate::ProxyUpstream); tests substitute their own.
pub trait NextHandler<B>: Send + Sync {
    /// Process an admitted request.
    fn call(&self, req: Request<B>) -> BoxFuture<'static, anyhow::Result<Response<GateBody>>>;
}

/// Path-based access-control filter sitting in front of a [`NextHandler`].
///
/// Holds a shared, immutable [`RuleEngine`] and the next handler.  Per
/// request it evaluates the URL path and either forwards (exactly once) or
/// answers 403 Forbidden with an empty body, never invoking the next
/// handler.  The filter itself has no per-request state, so a single
/// instance serves any number of concurrent connections.
pub struct PathFilter<B> {
    engine: Arc<RuleEngine>,
    next: Arc<dyn NextHandler<B>>,
}

impl<B> PathFilter<B> {
    /// Create a filter from a compiled engine and a next handler.
    pub fn new(engine: Arc<RuleEngine>, next: Arc<dyn NextHandler<B>>) -> Self {
        Self { engine, next }
    }

    /// Handle one request: evaluate its path, then forward or reject.
    ///
    /// A request with no retrievable path (authority-form URIs and the
    /// like) matches no pattern by definition and is forwarded.  An
    /// admitted request is indistinguishable from one that passed through
    /// no filter at all.
    pub async fn handle(&self, req: Request<B>) -> anyhow::Result<Response<GateBody>> {
        let decision = match req.uri().path_and_query() {
            Some(pq) => self.engine.evaluate(pq.path()),
            None => Decision::Admit,
        };

        match decision {
            Decision::Admit => self.next.call(req).await,
            Decision::Reject => {
                debug!(uri = %req.uri(), "request rejected");
                Ok(forbidden())
            }
        }
    }
}

/// Build a 403 Forbidden response with an empty body.
fn forbidden() -> Response<GateBody> {
    let mut response = Response::new(empty_body());
    *response.status_mut() = StatusCode::FORBIDDEN;
    response
}

/// An empty [`GateBody`].
pub(crate) fn empty_body() -> GateBody {
    Full::new(Bytes::new()).map_err(|never| match never {}).boxed()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use path_rules::RuleConfig;

    /// Next handler that counts invocations and answers 200 with an empty
    /// body, mirroring the role of a recording test backend.
    struct CountingNext {
        calls: AtomicUsize,
    }

    impl CountingNext {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl NextHandler<()> for CountingNext {
        fn call(&self, _req: Request<()>) -> BoxFuture<'static, anyhow::Result<Response<GateBody>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok(Response::new(empty_body())) })
        }
    }

    fn filter(block: &[&str], allow: &[&str], next: Arc<CountingNext>) -> PathFilter<()> {
        let config = RuleConfig {
            block: block.iter().map(|s| s.to_string()).collect(),
            allow: allow.iter().map(|s| s.to_string()).collect(),
        };
        let engine = RuleEngine::new(config).expect("test patterns should compile");
        PathFilter::new(Arc::new(engine), next)
    }

    fn request(path: &str) -> Request<()> {
        Request::builder()
            .uri(path)
            .body(())
            .expect("test request should build")
    }

    #[tokio::test]
    async fn blocked_path_gets_403_and_no_forward() {
        let next = CountingNext::new();
        let f = filter(&["/test"], &[], Arc::clone(&next));

        let response = f.handle(request("/test")).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(next.call_count(), 0);
    }

    #[tokio::test]
    async fn rejection_body_is_empty() {
        let next = CountingNext::new();
        let f = filter(&["/test"], &[], next);

        let response = f.handle(request("/test")).await.unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn admitted_path_forwards_exactly_once() {
        let next = CountingNext::new();
        let f = filter(&["/test", "/toto"], &[], Arc::clone(&next));

        let response = f.handle(request("/plop")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(next.call_count(), 1);
    }

    #[tokio::test]
    async fn allow_pattern_rescues_blocked_path() {
        let next = CountingNext::new();
        let f = filter(
            &["^/wp-admin(.*)"],
            &["^/wp-admin/admin-ajax\\.php(.*)"],
            Arc::clone(&next),
        );

        let response = f.handle(request("/wp-admin/admin-ajax.php")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(next.call_count(), 1);

        let response = f.handle(request("/wp-admin/options.php")).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(next.call_count(), 1);
    }

    #[tokio::test]
    async fn query_string_is_not_matched() {
        // Only the path is evaluated; the query portion never reaches the
        // engine.
        let next = CountingNext::new();
        let f = filter(&["/blocked"], &[], Arc::clone(&next));

        let response = f.handle(request("/open?redirect=/blocked")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(next.call_count(), 1);
    }

    #[tokio::test]
    async fn empty_block_list_admits_everything() {
        let next = CountingNext::new();
        let f = filter(&[], &["/irrelevant"], Arc::clone(&next));

        for path in ["/", "/a", "/irrelevant", "/deep/nested/path"] {
            f.handle(request(path)).await.unwrap();
        }
        assert_eq!(next.call_count(), 4);
    }

    #[tokio::test]
    async fn request_without_path_is_forwarded() {
        // Authority-form URIs (CONNECT-style) carry no path; the filter
        // must degrade to admit rather than fail.
        let next = CountingNext::new();
        let f = filter(&["(.*)"], &[], Arc::clone(&next));

        let req = Request::builder()
            .method(hyper::Method::CONNECT)
            .uri("example.com:443")
            .body(())
            .unwrap();

        let response = f.handle(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(next.call_count(), 1);
    }

    #[tokio::test]
    async fn repeated_evaluation_is_stable() {
        let next = CountingNext::new();
        let f = filter(&["^/bar(.*)"], &[], Arc::clone(&next));

        for _ in 0..5 {
            let response = f.handle(request("/bar/foo")).await.unwrap();
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
        }
        // Substring "/bar" is not at the start, and the pattern is anchored.
        let response = f.handle(request("/foo/bar")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(next.call_count(), 1);
    }
}
