use clap::Parser;
use clara_core::{GeminiClient, GeminiConfig};
use clara_server::{run_server, ConfigLayer, ServiceConfig};
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "clara-server", about = "Query Service for the Clara chat assistant")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    host: Option<IpAddr>,

    /// First port to try (falls back to the following ones if taken)
    #[arg(short, long)]
    port: Option<u16>,

    /// How many consecutive ports to try before giving up
    #[arg(long)]
    port_attempts: Option<u16>,

    /// Gemini model to use
    #[arg(short = 'o', long)]
    model: Option<String>,

    /// Directory holding the static assets (icons/)
    #[arg(long)]
    assets_dir: Option<PathBuf>,
}

impl Args {
    fn into_layer(self) -> ConfigLayer {
        ConfigLayer {
            host: self.host,
            port: self.port,
            port_attempts: self.port_attempts,
            assets_dir: self.assets_dir,
            gemini: GeminiConfig::new(None, self.model, None),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before anything reads the environment
    let dotenv_path = dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Some(path) = dotenv_path {
        info!("Loaded environment from {}", path.display());
    }

    // Parse command line args
    let mut args = Args::parse();

    // File, then environment, then command line
    let file_layer = match args.config.take() {
        Some(path) => {
            let layer = ConfigLayer::load_from_file(&path)?;
            info!("Loaded configuration from {}", path.display());
            layer
        }
        None => ConfigLayer::default(),
    };
    let layer = file_layer
        .merge(&ConfigLayer::from_env()?)
        .merge(&args.into_layer());

    let config = match ServiceConfig::from_layer(layer) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(anyhow::anyhow!("Configuration error: {}", e));
        }
    };

    // Initialize Gemini client
    let gemini_client = match GeminiClient::new(config.gemini.clone()) {
        Ok(client) => {
            info!(model = client.model_name(), "Gemini client initialized");
            client
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize Gemini client");
            return Err(anyhow::anyhow!("Failed to initialize Gemini client: {}", e));
        }
    };

    if let Err(e) = run_server(config, Arc::new(gemini_client)).await {
        error!(error = %e, "Clara server failed");
        return Err(e.into());
    }

    info!("Clara server shutting down");
    Ok(())
}
