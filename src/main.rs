//! `addon-wrapper` CLI - Query a stream addon and inspect the normalized output

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use addon_wrapper::manifest::manifest_url;
use addon_wrapper::{AddonInfo, AddonWrapper, ProxyRouter, StreamRequest, WrapperConfig};

#[derive(Parser)]
#[command(name = "addon-wrapper")]
#[command(about = "Query stream addons and print normalized streams")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/addon-wrapper/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch streams from an addon and print them as JSON
    Streams {
        /// Addon URL (stremio://, https:// or a manifest URL)
        url: String,

        /// Content type (movie, series, channel, tv)
        media_type: String,

        /// Content id (e.g. tt0133093 or tt0944947:1:1)
        id: String,

        /// Addon display name
        #[arg(short, long, default_value = "addon")]
        name: String,

        /// Request timeout in milliseconds (overrides config)
        #[arg(short, long)]
        timeout_ms: Option<u64>,

        /// Client IP to forward to the addon
        #[arg(long)]
        client_ip: Option<String>,
    },

    /// Print the canonical manifest URL for an addon URL
    Manifest {
        /// Addon URL
        url: String,
    },

    /// Show whether a URL would be sent through the proxy
    Route {
        /// Destination URL
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Streams {
            url,
            media_type,
            id,
            name,
            timeout_ms,
            client_ip,
        } => {
            cmd_streams(config, &url, media_type, id, name, timeout_ms, client_ip).await?;
        }
        Commands::Manifest { url } => {
            println!("{}", manifest_url(&url));
        }
        Commands::Route { url } => {
            let router = ProxyRouter::from_config(&config.proxy);
            println!("{}", if router.should_proxy(&url) { "proxy" } else { "direct" });
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<WrapperConfig> {
    match path {
        Some(path) => {
            let mut config = WrapperConfig::from_file(path)?;
            config.apply_env(|key| std::env::var(key).ok())?;
            Ok(config)
        }
        None => WrapperConfig::load(),
    }
}

async fn cmd_streams(
    mut config: WrapperConfig,
    url: &str,
    media_type: String,
    id: String,
    name: String,
    timeout_ms: Option<u64>,
    client_ip: Option<String>,
) -> Result<()> {
    if let Some(ms) = timeout_ms {
        config.timeout_ms = ms;
    }

    let addon = AddonInfo::new(name.clone(), name);
    let wrapper = AddonWrapper::new(addon, url, &config, client_ip)?;
    let result = wrapper
        .get_parsed_streams(&StreamRequest::new(media_type, id))
        .await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
