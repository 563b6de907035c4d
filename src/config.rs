//! Configuration from the environment
//!
//! Empty variables are treated as if they are not set

use std::net::SocketAddr;
use std::str::FromStr;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;

use crate::storage::StorageConfig;

const DEFAULT_ADDRESS: &str = "0.0.0.0:8080";

/// Server mode, decides how chatty the logs are
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Local development
    Debug,

    /// Production
    Release,

    /// Automated tests
    Test,
}

impl Mode {
    /// Log filter to use when `RUST_LOG` is not set
    pub fn default_log_filter(self) -> &'static str {
        match self {
            Mode::Debug => "notekeeper=debug,tower_http=debug",
            Mode::Release | Mode::Test => "notekeeper=info,tower_http=info",
        }
    }

    /// Should the logs be colored?
    pub fn use_ansi(self) -> bool {
        !matches!(self, Mode::Release)
    }
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(mode: &str) -> Result<Self> {
        match mode {
            "debug" => Ok(Mode::Debug),
            "release" => Ok(Mode::Release),
            "test" => Ok(Mode::Test),
            other => bail!("Unknown `SERVER_MODE` {other:?}, expected debug, release or test"),
        }
    }
}

/// Everything needed to start the server
pub struct Config {
    /// Server mode
    pub mode: Mode,

    /// Log filter, `RUST_LOG` or the default of the mode
    pub log_filter: String,

    /// Address to listen on
    pub address: SocketAddr,

    /// Where the notes are kept
    pub storage: StorageConfig,
}

impl Config {
    /// Read the configuration from the process environment
    ///
    /// # Errors
    ///
    /// Will return `Err` for invalid values or a missing `DATABASE_URL`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration with a custom lookup for variables
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let mode = var("SERVER_MODE").map_or(Ok(Mode::Debug), |mode| mode.parse())?;

        let log_filter = var("RUST_LOG").unwrap_or_else(|| mode.default_log_filter().to_string());

        let mut address = var("ADDRESS")
            .as_deref()
            .unwrap_or(DEFAULT_ADDRESS)
            .parse::<SocketAddr>()
            .context("Invalid `ADDRESS`")?;

        // optional override of just the port
        if let Some(port) = var("PORT") {
            address.set_port(port.parse::<u16>().context("Invalid `PORT`")?);
        }

        let storage = match var("STORAGE").as_deref() {
            None | Some("postgres") => StorageConfig::Postgres(
                var("DATABASE_URL").context("`DATABASE_URL` is required for Postgres storage")?,
            ),
            Some("memory") => StorageConfig::Memory,
            Some(other) => bail!("Unknown `STORAGE` {other:?}, expected postgres or memory"),
        };

        Ok(Self {
            mode,
            log_filter,
            address,
            storage,
        })
    }
}
