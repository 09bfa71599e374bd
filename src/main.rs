use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use dirserve::datetime::DisplayZone;
use dirserve::web::WebServer;
use dirserve::{Config, FileBrowser, ServedRoot};

/// Serve a folder over HTTP for browsing, downloading and uploading files.
#[derive(Parser, Debug)]
#[command(name = "dirserve")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Folder to serve (overrides files.root)
    #[arg(short, long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Address to bind (overrides server.host)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(root) = &self.root {
            config.files.root = root.to_string_lossy().into_owned();
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.verbose {
            config.logging.level = "debug".to_string();
        }
    }
}

fn load_config(cli: &Cli) -> dirserve::Result<Config> {
    let mut config = if cli.config.exists() {
        Config::load_with_env(&cli.config)?
    } else {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    };

    cli.apply(&mut config);
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = dirserve::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        dirserve::logging::init_console_only(&config.logging.level);
    }

    info!("dirserve {}", env!("CARGO_PKG_VERSION"));

    let root = match ServedRoot::new(&config.files.root) {
        Ok(root) => root,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let browser = FileBrowser::new(root)
        .with_page_size(config.files.page_size)
        .with_zone(DisplayZone::from_config(&config.display.timezone))
        .with_max_upload_size(config.max_upload_size_bytes());

    let server = match WebServer::new(&config.server, &config.web, browser) {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server stopped: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
