use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Tool-calling chat agent
#[derive(Debug, Parser)]
#[command(name = "toolchat", about = "Chat API backed by a language model that can call tools")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "toolchat.toml", env = "TOOLCHAT_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "TOOLCHAT_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Log filter directive, overridden by `RUST_LOG`
    #[arg(long, default_value = "info", env = "TOOLCHAT_LOG")]
    pub log: String,
}
