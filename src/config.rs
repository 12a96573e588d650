use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub application: ApplicationConfig,

    pub challenges: ChallengesConfig,

    pub server: ServerConfig,

    pub metadata: MetadataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Directory holding fixture JSON files. When unset, the fixtures
    /// compiled into the binary are used.
    pub fixtures_path: Option<String>,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/shop.db".to_string(),
            log_level: "info".to_string(),
            fixtures_path: None,
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Mail domain appended to fixture emails and substituted for the
    /// legacy domain in challenge texts.
    pub domain: String,

    /// Display name substituted for the legacy brand name.
    pub name: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            domain: "example.com".to_string(),
            name: "SafeApp".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengesConfig {
    pub show_hints: bool,

    pub show_mitigations: bool,

    /// Keep potentially harmful challenges enabled on every environment.
    pub safety_override: bool,

    /// Replaces the legacy embedded media widget in challenge descriptions.
    pub xss_bonus_payload: String,

    /// Environments treated as active in addition to the detected ones
    /// (e.g. `["Docker"]`).
    pub forced_environments: Vec<String>,
}

impl Default for ChallengesConfig {
    fn default() -> Self {
        Self {
            show_hints: true,
            show_mitigations: true,
            safety_override: false,
            xss_bonus_payload: "<script>alert(1)</script>".to_string(),
            forced_environments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Literal URL that is rewritten to `server.base_url` after seeding.
    pub placeholder_url: String,

    pub files: Vec<String>,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            placeholder_url: "http://localhost:3000".to_string(),
            files: Vec::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("shopseed").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".shopseed").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.application.domain.trim().is_empty() {
            anyhow::bail!("Application domain cannot be empty");
        }

        url::Url::parse(&self.server.base_url)
            .with_context(|| format!("Invalid server base URL: {}", self.server.base_url))?;

        if !self.metadata.files.is_empty() && self.metadata.placeholder_url.is_empty() {
            anyhow::bail!("Metadata placeholder URL cannot be empty when files are listed");
        }

        Ok(())
    }
}
