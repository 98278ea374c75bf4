mod cli;
mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use http_gate::{Gateway, PathFilter, ProxyUpstream};
use path_rules::RuleEngine;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Parse CLI args.
    let cli = Cli::parse();

    // 2. Load config, then merge CLI overrides.
    let mut cfg = config::load(&cli.config)?;

    if let Some(ref rules) = cli.rules {
        cfg.rules_file = rules.clone();
    }
    if let Some(ref listen) = cli.listen {
        cfg.network.listen_addr = listen.clone();
    }
    if let Some(ref upstream) = cli.upstream {
        cfg.network.upstream_addr = upstream.clone();
    }

    // 3. Init tracing-subscriber with JSON format.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    info!(
        config_file = %cli.config.display(),
        rules_file = %cfg.rules_file.display(),
        listen = %cfg.network.listen_addr,
        upstream = %cfg.network.upstream_addr,
        "pathgate starting"
    );

    // 4. Load rules and build the engine.  A single invalid pattern is a
    //    hard configuration error: refuse to serve rather than filter with
    //    a partial rule set.
    let rule_config =
        path_rules::loader::load_rules(&cfg.rules_file).context("failed to load rules file")?;
    let engine = RuleEngine::new(rule_config).context("failed to compile path rules")?;

    info!(?engine, "rule engine built");

    // 5. Wire the filter in front of the upstream forwarder.
    let listen_addr: SocketAddr = cfg
        .network
        .listen_addr
        .parse()
        .context("invalid listen address")?;
    let upstream_addr: SocketAddr = cfg
        .network
        .upstream_addr
        .parse()
        .context("invalid upstream address")?;

    let upstream = ProxyUpstream::new(upstream_addr);
    let filter = PathFilter::new(Arc::new(engine), Arc::new(upstream));
    let gateway = Gateway::new(listen_addr, filter);

    // 6. Run until the accept loop fails or a shutdown signal arrives.
    tokio::select! {
        result = gateway.run() => {
            result?;
        }
        _ = shutdown_signal() => {}
    }

    info!("pathgate shutting down");
    Ok(())
}

/// Wait for SIGINT (ctrl-c) or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to register SIGTERM handler");

        tokio::select! {
            _ = ctrl_c => {
                info!("received SIGINT (ctrl-c)");
            }
            _ = sigterm.recv() => {
                info!("received SIGTERM");
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("received SIGINT (ctrl-c)");
    }
}
