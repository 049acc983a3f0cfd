use std::fs::File;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use log::{info, warn};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use parley::backend::{ChatBackend, HttpBackend};
use parley::core::config::{self, CliOverrides, ParleyConfig};
use parley::tui;

/// How long startup waits for the server profile before going on without it.
const PROFILE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Parser)]
#[command(name = "parley", about = "Terminal chat client for a JSON chatbot endpoint")]
struct Args {
    /// Chat server base URL (e.g. http://localhost:5000)
    #[arg(short, long)]
    url: Option<String>,

    /// Strip untrusted markup from bot replies
    #[arg(long)]
    sanitize: bool,

    /// Query the server's health endpoint and exit
    #[arg(long)]
    health: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to parley.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("parley.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        warn!("Ignoring config file: {}", e);
        ParleyConfig::default()
    });
    let cli = CliOverrides {
        base_url: args.url,
        sanitize_bot_html: args.sanitize,
    };

    let base_url = config::resolve_base_url(&file_config, &cli);
    let backend = Arc::new(HttpBackend::new(base_url));
    info!("Parley starting up against {}", backend.base_url());

    if args.health {
        return health_check(backend.as_ref()).await;
    }

    let profile = match tokio::time::timeout(PROFILE_TIMEOUT, backend.fetch_profile()).await {
        Ok(Ok(profile)) => {
            info!("Server profile: {:?}", profile);
            Some(profile)
        }
        Ok(Err(e)) => {
            warn!("Could not fetch server profile: {}", e);
            None
        }
        Err(_) => {
            warn!("Server profile request timed out after {:?}", PROFILE_TIMEOUT);
            None
        }
    };

    let resolved = config::resolve(&file_config, &cli, profile.as_ref());
    tui::run(backend, resolved)
}

/// Print the server's health report. Exits non-zero when the server is
/// unreachable or reports anything other than `healthy`.
async fn health_check(backend: &HttpBackend) -> std::io::Result<()> {
    match backend.health().await {
        Ok(health) => {
            println!("{}: {}", backend.base_url(), health.status);
            for (key, value) in &health.details {
                println!("  {key}: {value}");
            }
            if !health.is_healthy() {
                std::process::exit(1);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}: {}", backend.base_url(), e);
            std::process::exit(1);
        }
    }
}
