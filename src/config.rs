use std::fs::{self, OpenOptions};
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://nourrise.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Fixed seed for advice selection; random when unset.
    pub advice_seed: Option<u64>,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be host:port")?;
        let advice_seed = lookup("ADVICE_SEED")
            .map(|raw| raw.parse::<u64>().with_context(|| format!("ADVICE_SEED '{raw}' is not a u64")))
            .transpose()?;
        Ok(Self { database_url, bind_addr, advice_seed })
    }
}

/// Filesystem path behind a `sqlite://` URL, without its `?options`.
/// `None` for in-memory databases and non-SQLite URLs.
pub fn sqlite_file_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") { return None; }
    let rest = database_url.strip_prefix("sqlite://")?;
    let path = rest.split_once('?').map_or(rest, |(path, _)| path);
    if path.is_empty() || path == ":memory:" { return None; }
    // Windows drive paths arrive as /C:/...
    let path = match path.as_bytes() {
        [b'/', _, b':', ..] if cfg!(windows) => &path[1..],
        _ => path,
    };
    Some(PathBuf::from(path))
}

/// Creates the database file and its parent directories so the pool can open it.
pub fn prepare_sqlite_file(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_file_path(database_url) else { return Ok(()) };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening {}", path.display()))?;
    tracing::debug!(path = %path.display(), "sqlite file ready");
    Ok(())
}
