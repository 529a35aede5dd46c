//! Server configuration sourced from CLI flags (SPEC_FULL.md §6).

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "arena-server", about = "Authoritative 5v5 arena battle server")]
pub struct Config {
    /// TCP port to bind and accept connections on.
    #[arg(long, default_value_t = 8888)]
    pub port: u16,

    /// Path to the username/password persistence file.
    #[arg(long, default_value = "users.txt")]
    pub persist_path: String,

    /// `env_logger` filter level (error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Simulation tick length in milliseconds.
    #[arg(long, default_value_t = arena_core::DEFAULT_TICK_MS)]
    pub tick_ms: u64,
}

impl Config {
    pub fn from_args() -> Config {
        Config::parse()
    }
}
