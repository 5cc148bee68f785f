//! Command-line surface
//!
//! `melange [OPTIONS] [RESOURCE] [OPERATION] [key=value ...]`

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, ValueEnum};

/// Command-line client for the Melange IP address management service
#[derive(Debug, Parser)]
#[command(name = "melange", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    /// Resource to act on (e.g. ip_block); lists resources when omitted
    pub resource: Option<String>,

    /// Operation to invoke (e.g. create); lists operations when omitted
    pub operation: Option<String>,

    /// Operation arguments as key=value pairs
    #[arg(value_name = "KEY=VALUE")]
    pub args: Vec<String>,
}

/// Connection, auth and output options
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOpts {
    /// Melange server host [default: localhost]
    #[arg(long)]
    pub host: Option<String>,

    /// Melange server port [default: 9898]
    #[arg(long)]
    pub port: Option<u16>,

    /// Talk https to the server
    #[arg(long)]
    pub use_ssl: bool,

    /// Request timeout in seconds [default: 60]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Tenant id to scope requests to
    #[arg(short = 't', long = "tenant", value_name = "TENANT_ID")]
    pub tenant_id: Option<String>,

    /// Identity service URL for token requests
    #[arg(long)]
    pub auth_url: Option<String>,

    /// Identity service user name
    #[arg(long)]
    pub username: Option<String>,

    /// Identity service API key
    #[arg(long)]
    pub api_key: Option<String>,

    /// Pre-issued auth token; skips the identity service
    #[arg(long)]
    pub auth_token: Option<String>,

    /// Config file [default: $XDG_CONFIG_HOME/melange/config.toml]
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Result rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML document
    #[default]
    Yaml,
    /// Pretty-printed JSON
    Json,
    /// Bordered table
    Table,
}
