use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Global configuration loaded from `~/.config/rimport/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RimportConfig {
    /// Cache root for fetched modules. None = `~/.cache/rimport/modules`.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Default vendor root for `rimport vendor`.
    #[serde(default = "default_vendor_dir")]
    pub vendor_dir: PathBuf,
    /// Manifest file name written inside the vendor root.
    #[serde(default = "default_manifest_name")]
    pub manifest_name: String,
    /// Command (program + leading args) used to execute the linked entry module.
    #[serde(default = "default_runtime")]
    pub runtime: Vec<String>,
    /// HTTP connect timeout in seconds. Transfers themselves are not time-limited.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// User-declared aliases: bare specifier -> module URL.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

fn default_vendor_dir() -> PathBuf {
    PathBuf::from("vendor")
}

fn default_manifest_name() -> String {
    "import_map.json".to_string()
}

fn default_runtime() -> Vec<String> {
    vec!["node".to_string()]
}

fn default_connect_timeout_secs() -> u64 {
    30
}

impl Default for RimportConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            vendor_dir: default_vendor_dir(),
            manifest_name: default_manifest_name(),
            runtime: default_runtime(),
            connect_timeout_secs: default_connect_timeout_secs(),
            aliases: BTreeMap::new(),
        }
    }
}

impl RimportConfig {
    /// Cache root: the configured `cache_dir`, else the XDG cache home.
    pub fn cache_root(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.cache_dir {
            return Ok(dir.clone());
        }
        let xdg_dirs = xdg::BaseDirectories::with_prefix("rimport")?;
        Ok(xdg_dirs.get_cache_home().join("modules"))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rimport")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RimportConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RimportConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit file (e.g. `--config`). The file must exist.
pub fn load_from_path(path: &Path) -> Result<RimportConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: RimportConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
