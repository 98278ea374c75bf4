use std::net::SocketAddr;
use std::sync::Arc;

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use crate::filter::PathFilter;

/// The listening HTTP server.
///
/// Accepts client connections, serves each in its own Tokio task, and runs
/// every request through the shared [`PathFilter`].
pub struct Gateway {
    listen_addr: SocketAddr,
    filter: Arc<PathFilter<Incoming>>,
}

impl Gateway {
    /// Create a gateway serving `filter` on `listen_addr`.
    pub fn new(listen_addr: SocketAddr, filter: PathFilter<Incoming>) -> Self {
        Self {
            listen_addr,
            filter: Arc::new(filter),
        }
    }

    /// Run the gateway.
    ///
    /// Binds to the listen address and loops forever accepting
    /// connections.  Each connection is handled in its own task; a failed
    /// connection never takes the accept loop down with it.
    pub async fn run(&self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.listen_addr).await?;
        tracing::info!(addr = %self.listen_addr, "http-gate listening");

        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let filter = Arc::clone(&self.filter);

            tokio::spawn(async move {
                let connection_id = uuid::Uuid::new_v4();
                tracing::debug!(%connection_id, %remote_addr, "client connected");

                let io = TokioIo::new(stream);
                let service = service_fn(move |req| {
                    let filter = Arc::clone(&filter);
                    async move { filter.handle(req).await }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    tracing::debug!(%connection_id, %remote_addr, %err, "connection ended with error");
                }
            });
        }
    }
}
