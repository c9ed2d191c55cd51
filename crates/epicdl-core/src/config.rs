use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Substituted when the API key variable is unset. Upstream rejects it, so
/// every request fails and is reported; the run itself does not crash.
pub const API_KEY_PLACEHOLDER: &str = "<INSERT_API_KEY>";

/// Default creation mode for written files (before umask).
pub const DEFAULT_FILE_MODE: u32 = 0o777;

/// EPIC image collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    #[default]
    Natural,
    Enhanced,
    Aerosol,
    Cloud,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Natural => "natural",
            Collection::Enhanced => "enhanced",
            Collection::Aerosol => "aerosol",
            Collection::Cloud => "cloud",
        }
    }
}

/// Archive image format; also the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
        }
    }
}

/// Global configuration loaded from `~/.config/epicdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpicConfig {
    /// API root; feed is `<api_base>/api/...`, assets `<api_base>/archive/...`.
    pub api_base: String,
    pub collection: Collection,
    pub image_format: ImageFormat,
    /// Items per worker chunk.
    pub worker_size: usize,
    /// Total timeout per HTTP request, in seconds.
    pub http_timeout_secs: u64,
    /// Buffer depth of the status channel.
    pub channel_depth: usize,
    /// Directory for `<token>.json` metadata files.
    pub data_dir: PathBuf,
    /// Directory for downloaded images.
    pub image_dir: PathBuf,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Unix mode for created files (None = 0o777, subject to umask).
    #[serde(default)]
    pub file_mode: Option<u32>,
}

impl Default for EpicConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.nasa.gov/EPIC".to_string(),
            collection: Collection::Natural,
            image_format: ImageFormat::Png,
            worker_size: 3,
            http_timeout_secs: 10,
            channel_depth: 1,
            data_dir: PathBuf::from("./data"),
            image_dir: PathBuf::from("./images"),
            api_key_env: "NASA_KEY".to_string(),
            file_mode: None,
        }
    }
}

impl EpicConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn file_mode(&self) -> u32 {
        self.file_mode.unwrap_or(DEFAULT_FILE_MODE)
    }

    /// Reads the API key from `api_key_env`, falling back to the placeholder.
    pub fn resolve_api_key(&self) -> String {
        resolve_api_key(std::env::var(&self.api_key_env).ok())
    }
}

fn resolve_api_key(value: Option<String>) -> String {
    match value {
        Some(key) if !key.is_empty() => key,
        _ => {
            tracing::warn!("API key not set; using placeholder, requests will be rejected upstream");
            API_KEY_PLACEHOLDER.to_string()
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("epicdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<EpicConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = EpicConfig::default();
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

/// Load configuration from an explicit file (no default is written).
pub fn load_from_path(path: &Path) -> Result<EpicConfig> {
    let data = fs::read_to_string(path)?;
    let cfg: EpicConfig = toml::from_str(&data)?;
    Ok(cfg)
}
