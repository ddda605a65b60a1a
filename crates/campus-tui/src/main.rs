//! Campus chat terminal client.
//!
//! # Usage
//!
//! ```bash
//! # Production backend
//! campus-chat --name Alice
//!
//! # Built-in sample data, no network
//! campus-chat --offline
//!
//! # Local backend with debug logs
//! campus-chat --api http://localhost:8000/api/v1 --ws ws://localhost:8000 \
//!     --log-file chat.log --log-level debug
//! ```

use std::path::{Path, PathBuf};

use campus_app::{
    ChatConfig, DEFAULT_API_BASE, DEFAULT_PAGE_SIZE, DEFAULT_SELF_LABEL, DEFAULT_WS_BASE,
    DataSource, Runtime,
};
use campus_tui::TerminalDriver;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Campus marketplace chat client
#[derive(Parser, Debug)]
#[command(name = "campus-chat")]
#[command(about = "Terminal client for campus marketplace chats")]
#[command(version)]
struct Args {
    /// REST API base address
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api: String,

    /// Realtime channel base address
    #[arg(long, default_value = DEFAULT_WS_BASE)]
    ws: String,

    /// Messages to load when opening a chat
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// Use built-in sample chats instead of the network
    #[arg(long)]
    offline: bool,

    /// Sender label for your own messages
    #[arg(long, default_value = DEFAULT_SELF_LABEL)]
    name: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Write logs to this file. Nothing is logged without it.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Log to a file so output never lands on the terminal UI.
fn init_tracing(path: &Path, level: &str) -> WorkerGuard {
    let directory = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let file_name = path.file_name().unwrap_or(path.as_os_str());
    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let _guard = args.log_file.as_deref().map(|path| init_tracing(path, &args.log_level));

    let mut config = ChatConfig::from_urls(&args.api, &args.ws)?;
    config.page_size = args.page_size;
    config.self_label = args.name;
    if args.offline {
        config.source = DataSource::Fixtures;
    }
    config.validate()?;

    tracing::info!(api = %config.endpoints.api_base(), source = ?config.source, "campus chat starting");

    let driver = TerminalDriver::new(&config)?;
    Ok(Runtime::new(driver, config).run().await?)
}
