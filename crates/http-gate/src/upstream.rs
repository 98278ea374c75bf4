use std::net::SocketAddr;

use anyhow::Context;
use futures_util::future::BoxFuture;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::{Request, Response, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tracing::trace;

use crate::filter::{GateBody, NextHandler};

/// Next handler that forwards admitted requests to a fixed upstream.
///
/// The request is forwarded verbatim apart from the URI authority, which
/// is rewritten to point at the upstream address.  Connection pooling is
/// handled by the legacy hyper client, which is cheap to clone.
pub struct ProxyUpstream {
    client: Client<HttpConnector, Incoming>,
    authority: String,
}

impl ProxyUpstream {
    /// Create a forwarder targeting `upstream_addr` over plain HTTP.
    pub fn new(upstream_addr: SocketAddr) -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self {
            client,
            authority: upstream_addr.to_string(),
        }
    }
}

impl NextHandler<Incoming> for ProxyUpstream {
    fn call(&self, mut req: Request<Incoming>) -> BoxFuture<'static, anyhow::Result<Response<GateBody>>> {
        let client = self.client.clone();
        let uri = Uri::builder()
            .scheme("http")
            .authority(self.authority.clone())
            .path_and_query(
                req.uri()
                    .path_and_query()
                    .map(|pq| pq.as_str())
                    .unwrap_or("/")
                    .to_string(),
            )
            .build();

        Box::pin(async move {
            let uri = uri.context("failed to build upstream URI")?;
            trace!(%uri, "forwarding request upstream");
            *req.uri_mut() = uri;
            let response = client
                .request(req)
                .await
                .context("upstream request failed")?;
            Ok(response.map(|body| body.boxed()))
        })
    }
}
