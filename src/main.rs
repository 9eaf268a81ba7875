//! msglog-server: shared-secret JSON message logger.
//!
//! ```text
//!     POST / (X-Api-Key)
//!     ─────────────────────▶ ┌──────────┐    ┌──────────┐    ┌────────────┐
//!                            │ security │───▶│ payload  │───▶│  storage   │──▶ messages.json
//!     {"status":"ok"}        │ api_key  │    │  parse   │    │ MessageLog │
//!     ◀───────────────────── └──────────┘    └──────────┘    └────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use message_logger::lifecycle::{startup, StartupOptions};

#[derive(Parser)]
#[command(name = "msglog-server")]
#[command(about = "Append authenticated JSON messages to a JSON array file")]
struct Cli {
    /// Configuration file (TOML, or JSON when it ends in .json).
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Reload the configuration when the file changes.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    startup::run(StartupOptions {
        config_path: cli.config,
        bind_override: cli.bind,
        watch: cli.watch,
    })
    .await
}
