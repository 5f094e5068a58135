use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// HTTP settings shared by listing fetches, manifest fetches and downloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Seconds allowed to establish a connection.
    pub connect_timeout_secs: u64,
    /// Upper bound in seconds for one listing or manifest fetch.
    pub timeout_secs: u64,
    /// Upper bound in seconds for one artifact download.
    pub download_timeout_secs: u64,
    /// User-Agent sent with every request.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 30,
            download_timeout_secs: 3600,
            user_agent: crate::USER_AGENT.to_string(),
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

/// Global configuration loaded from `~/.config/oscat/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OscatConfig {
    /// Pause between two distinct distributions (crawl and download), in milliseconds.
    pub distribution_delay_ms: u64,
    pub http: HttpConfig,
}

impl Default for OscatConfig {
    fn default() -> Self {
        Self {
            distribution_delay_ms: 2000,
            http: HttpConfig::default(),
        }
    }
}

impl OscatConfig {
    pub fn distribution_delay(&self) -> Duration {
        Duration::from_millis(self.distribution_delay_ms)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("oscat")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<OscatConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = OscatConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: OscatConfig = toml::from_str(&data)?;
    Ok(cfg)
}
