//! Process configuration.
//!
//! Flags and environment variables via clap, with `.env` loading handled
//! by the binary entry point. The token secret has no default: refusing
//! to start beats silently signing with a well-known key.

use std::net::SocketAddr;

use anyhow::{Context, bail};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "roster-server", about = "User account service")]
pub struct Cli {
    /// Address to listen on
    #[arg(long, env = "ROSTER_BIND", default_value = "127.0.0.1:3000")]
    pub bind: String,

    /// Secret used to sign session tokens
    #[arg(long, env = "ROSTER_TOKEN_SECRET", hide_env_values = true)]
    pub token_secret: Option<String>,

    /// Postgres connection URL; omit to run on the in-memory store
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: SocketAddr,
    pub token_secret: String,
    pub database_url: Option<String>,
}

impl Config {
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        let bind: SocketAddr = cli
            .bind
            .parse()
            .with_context(|| format!("invalid bind address {:?}", cli.bind))?;

        let Some(token_secret) = cli.token_secret else {
            bail!("ROSTER_TOKEN_SECRET must be set");
        };
        if token_secret.len() < 16 {
            bail!("ROSTER_TOKEN_SECRET must be at least 16 bytes");
        }

        Ok(Self {
            bind,
            token_secret,
            database_url: cli.database_url,
        })
    }
}
