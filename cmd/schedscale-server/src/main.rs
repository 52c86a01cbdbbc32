use clap::Parser;
use pkg_api::server::{ServerConfig, start_server};
use pkg_types::config::{ServerConfigFile, load_config_file, reconcile_interval};
use std::net::SocketAddr;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "schedscale-server", about = "schedscale control plane server")]
struct Cli {
    /// Path to YAML config file
    #[arg(long, short, default_value = "/etc/schedscale/config.yaml")]
    config: String,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Directory for SlateDB state storage
    #[arg(long)]
    data_dir: Option<String>,

    /// Reconcile interval, e.g. "10s" or "2m"
    #[arg(long)]
    reconcile_interval: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    // Load config file (returns defaults if file not found)
    let file_cfg: ServerConfigFile = load_config_file(&cli.config)?;
    info!("Config file: {}", cli.config);

    // Merge: CLI args > config file > env > defaults
    let port = cli.port.or(file_cfg.port).unwrap_or(8444);
    let data_dir = cli
        .data_dir
        .or(file_cfg.data_dir)
        .unwrap_or_else(|| "/tmp/schedscale-data".to_string());
    let interval = reconcile_interval(
        cli.reconcile_interval
            .as_deref()
            .or(file_cfg.reconcile_interval.as_deref()),
    );

    info!("Starting schedscale-server");
    info!("  Port:      {}", port);
    info!("  Data dir:  {}", data_dir);
    info!("  Interval:  {}s", interval.as_secs());

    let config = ServerConfig {
        addr: SocketAddr::from(([0, 0, 0, 0], port)),
        data_dir,
        reconcile_interval: interval,
    };

    start_server(config).await?;

    Ok(())
}
