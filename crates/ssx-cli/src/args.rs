use std::net::SocketAddr;

use clap::{Parser, ValueEnum};

/// SSX simulator - stands in for the asynchronous provisioning API during provider tests
#[derive(Parser, Debug)]
#[command(name = "ssx-simulator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Address to listen on
    #[arg(long = "bind", env = "SSX_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Log output format (filter with RUST_LOG)
    #[arg(long = "log-format", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}
