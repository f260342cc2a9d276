mod config;
mod error;
mod logging;
mod stdio;

use aladhan_mcp_tools::AladhanTools;
use anyhow::Context as _;
use clap::Parser;
use config::{LogFormat, Overrides, ServerConfig};
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    name = "aladhan-mcp-server",
    version,
    about = "MCP server (stdio) for Aladhan prayer times, Hijri dates and Qibla direction"
)]
struct Cli {
    /// YAML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Aladhan API root.
    #[arg(long, env = "ALADHAN_BASE_URL")]
    base_url: Option<String>,

    /// Per-request upstream timeout in seconds.
    #[arg(long, env = "ALADHAN_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Log filter (`RUST_LOG` takes precedence when set).
    #[arg(long)]
    log_level: Option<String>,

    #[arg(long, value_enum, env = "ALADHAN_LOG_FORMAT")]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ServerConfig::load(cli.config.as_deref())
        .with_context(|| match &cli.config {
            Some(path) => format!("load config {}", path.display()),
            None => "load default config".to_string(),
        })?
        .with_overrides(Overrides {
            base_url: cli.base_url,
            timeout_secs: cli.timeout_secs,
            log_level: cli.log_level,
            log_format: cli.log_format,
        });
    config.validate().context("invalid configuration")?;

    logging::init(&config.log)?;
    debug!(?config, "configuration resolved");

    let tools = AladhanTools::new(&config.upstream).context("build Aladhan client")?;
    info!(
        base_url = %config.upstream.base_url,
        timeout_secs = config.upstream.timeout_secs,
        "aladhan MCP server listening on stdio"
    );

    stdio::serve(
        &tools,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
    .context("stdio transport")?;

    Ok(())
}
