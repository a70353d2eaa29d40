use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use log::{error, info};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use roomchat::core::config::{self, CliOverrides};
use roomchat::tui;

#[derive(Parser)]
#[command(name = "roomchat", about = "Terminal client for a single shared chat room")]
struct Args {
    /// REST base URL, e.g. http://localhost:4000/api
    #[arg(long)]
    server: Option<String>,

    /// Websocket URL for live updates, e.g. ws://localhost:4000/ws
    #[arg(long)]
    socket: Option<String>,

    /// Bearer token for the session
    #[arg(long)]
    token: Option<String>,

    /// Your user id; messages with this author can be edited
    #[arg(long)]
    user: Option<String>,

    /// Config file to read instead of ~/.roomchat/config.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // File logger - the terminal belongs to the TUI
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("roomchat.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config(args.config.as_deref()).map_err(|e| {
        error!("{}", e);
        std::io::Error::other(e.to_string())
    })?;

    let cli = CliOverrides {
        server: args.server,
        socket: args.socket,
        token: args.token,
        user: args.user,
    };
    let resolved = config::resolve(&file_config, &cli);

    if resolved.token.is_none() {
        eprintln!(
            "No session token. Pass --token, set ROOMCHAT_TOKEN, or add `token` under [server] in {}",
            config::config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "~/.roomchat/config.toml".to_string())
        );
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "missing session token",
        ));
    }

    info!(
        "roomchat starting up: server={} socket={} user={:?}",
        resolved.base_url, resolved.socket_url, resolved.user_id
    );

    tui::run(resolved)
}
