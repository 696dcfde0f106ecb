use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::editor::EditorConfig;
use crate::error::{RecipeError, Result};
use crate::validation::{RecipeLimits, MAX_INGREDIENTS};

/// Default request body cap for imports (1 MB)
pub const DEFAULT_MAX_IMPORT_BYTES: usize = 1_000_000;

/// TheMealDB public API
pub const DEFAULT_EXTERNAL_API_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// Centralized configuration for recipectl
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipectlConfig {
    /// Row limits for the interactive editor
    pub editor: EditorConfig,
    pub server: ServerSettings,
    pub client: ClientSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: SocketAddr,
    pub cors_permissive: bool,
    /// Ingredient cap enforced by the API
    pub max_ingredients: usize,
    pub max_import_bytes: usize,
    /// Recipes imported at startup when the file exists
    pub seed_file: Option<PathBuf>,
    /// Merge TheMealDB results into searches and id lookups
    pub external_source: bool,
    pub external_api_url: String,
    pub external_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
            cors_permissive: false,
            max_ingredients: MAX_INGREDIENTS,
            max_import_bytes: DEFAULT_MAX_IMPORT_BYTES,
            seed_file: None,
            external_source: true,
            external_api_url: DEFAULT_EXTERNAL_API_URL.to_string(),
            external_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Base URL of the recipe API
    pub server_url: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".to_string(),
        }
    }
}

impl RecipectlConfig {
    /// Load config from ~/.recipectl/config.toml, then apply env overrides.
    ///
    /// A missing file is not an error: defaults are used.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Self::default()
        };

        config.apply_env();
        Ok(config)
    }

    /// Parse a config file without env overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RecipeError::path_not_found(path));
        }

        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| RecipeError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Get config file path: ~/.recipectl/config.toml
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".recipectl/config.toml")
    }

    /// RECIPECTL_BIND and RECIPECTL_SERVER_URL take precedence over the file
    fn apply_env(&mut self) {
        if let Ok(bind) = env::var("RECIPECTL_BIND") {
            match bind.parse() {
                Ok(addr) => self.server.bind = addr,
                Err(_) => tracing::warn!(value = %bind, "ignoring invalid RECIPECTL_BIND"),
            }
        }
        if let Ok(url) = env::var("RECIPECTL_SERVER_URL") {
            if !url.trim().is_empty() {
                self.client.server_url = url;
            }
        }
    }

    /// Serialize as TOML (used by `config init` and `config show`)
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Limits the API enforces on recipe bodies
    pub fn limits(&self) -> RecipeLimits {
        RecipeLimits {
            max_ingredients: self.server.max_ingredients,
            ..RecipeLimits::default()
        }
    }
}
