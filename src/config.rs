// ⚙️ Server Configuration - Command line flags

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(version, about = "Serve a ledger file as a dashboard time-series datasource")]
pub struct Config {
    /// Ledger file name
    #[arg(short = 'f', long = "file", value_name = "LEDGER")]
    pub ledger_file: PathBuf,

    /// Address to listen on
    #[arg(short = 'l', long, value_name = "ADDR", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Log filter, e.g. "info" or "ledger_datasource=debug,tower_http=debug"
    #[arg(long, value_name = "FILTER", env = "RUST_LOG", default_value = "info")]
    pub log: String,
}
