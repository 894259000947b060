mod api_base;

pub use api_base::{normalize_api_base, ConfigError, DEFAULT_DEV_API_BASE};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Deployment mode. Decides which download strategies the dispatcher tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    /// No proxy route available: fetch in-process, then fall back to a new tab.
    Dev,
    /// Route downloads through the attachment proxy first.
    #[default]
    Prod,
}

/// Upstream fetch limits (optional `[fetch]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout in seconds (None = wait indefinitely).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Maximum number of redirects to follow.
    pub max_redirections: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: Some(300),
            max_redirections: 10,
        }
    }
}

/// Download proxy settings (optional `[proxy]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Socket address the proxy listens on.
    pub bind_addr: String,
    /// Route serving downloads, also used by the dispatcher to build proxy URLs.
    pub route: String,
    /// Origin the dispatcher resolves proxy routes against.
    pub public_origin: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8787".to_string(),
            route: "/api/download".to_string(),
            public_origin: "http://127.0.0.1:8787".to_string(),
        }
    }
}

/// Global configuration loaded from `~/.config/hubdl/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HubdlConfig {
    /// "dev" or "prod" (default).
    #[serde(default)]
    pub runtime_mode: RuntimeMode,
    /// Base URL of the materials REST API. Required in prod.
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// Where the CLI saves downloads (None = current directory).
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl HubdlConfig {
    /// The validated REST API base for the configured mode.
    pub fn api_base(&self) -> Result<String, ConfigError> {
        normalize_api_base(self.api_base_url.as_deref(), self.runtime_mode)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("hubdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<HubdlConfig> {
    load_or_init_at(&config_path()?)
}

/// [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<HubdlConfig> {
    if !path.exists() {
        let default_cfg = HubdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: HubdlConfig = toml::from_str(&data)
        .with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = HubdlConfig::default();
        assert_eq!(cfg.runtime_mode, RuntimeMode::Prod);
        assert_eq!(cfg.proxy.route, "/api/download");
        assert_eq!(cfg.proxy.bind_addr, "127.0.0.1:8787");
        assert_eq!(cfg.fetch.connect_timeout_secs, 15);
        assert_eq!(cfg.fetch.timeout_secs, Some(300));
        assert!(cfg.api_base_url.is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = HubdlConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: HubdlConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.runtime_mode, cfg.runtime_mode);
        assert_eq!(parsed.proxy, cfg.proxy);
        assert_eq!(parsed.fetch, cfg.fetch);
    }

    #[test]
    fn config_toml_partial() {
        let toml = r#"
            runtime_mode = "dev"
            api_base_url = "https://api.rguhub.example"

            [fetch]
            connect_timeout_secs = 5
            max_redirections = 3
        "#;
        let cfg: HubdlConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.runtime_mode, RuntimeMode::Dev);
        assert_eq!(cfg.fetch.connect_timeout_secs, 5);
        assert_eq!(cfg.fetch.max_redirections, 3);
        assert!(cfg.fetch.timeout_secs.is_none());
        assert_eq!(cfg.proxy, ProxyConfig::default());
        assert_eq!(cfg.api_base().unwrap(), "https://api.rguhub.example");
    }

    #[test]
    fn config_toml_rejects_unknown_mode() {
        let toml = r#"runtime_mode = "staging""#;
        assert!(toml::from_str::<HubdlConfig>(toml).is_err());
    }

    #[test]
    fn load_or_init_writes_default_then_reads_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hubdl").join("config.toml");

        let first = load_or_init_at(&path).unwrap();
        assert_eq!(first.runtime_mode, RuntimeMode::Prod);
        assert!(path.exists());

        let edited = fs::read_to_string(&path)
            .unwrap()
            .replace("runtime_mode = \"prod\"", "runtime_mode = \"dev\"");
        fs::write(&path, edited).unwrap();

        let second = load_or_init_at(&path).unwrap();
        assert_eq!(second.runtime_mode, RuntimeMode::Dev);
        assert_eq!(second.proxy, ProxyConfig::default());
    }

    #[test]
    fn load_or_init_reports_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "runtime_mode = [").unwrap();

        let err = load_or_init_at(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("config.toml"));
    }
}
