use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pathgate", version, about = "Reverse proxy that blocks requests by URL path")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Path to the rules file (overrides config file setting)
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// Listen address (overrides config file setting)
    #[arg(long)]
    pub listen: Option<String>,

    /// Upstream address (overrides config file setting)
    #[arg(long)]
    pub upstream: Option<String>,
}
