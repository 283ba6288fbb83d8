//! Configuration management for coursedex.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for coursedex.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory containing catalog JSON files.
    pub catalog_path: PathBuf,

    /// Directory to store the index snapshot.
    pub index_path: PathBuf,

    /// HTTP server settings.
    pub server: ServerConfig,

    /// Search and ranking settings.
    pub search: SearchConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `127.0.0.1:8381`.
    pub bind: String,

    /// Absolute base URL used when rendering pagination and facet links.
    pub public_base_url: String,

    /// Partner short code used when a request does not name one.
    pub default_partner: String,

    /// Accepted API tokens.
    pub api_tokens: Vec<String>,

    /// Page size when the request does not set `page_size`.
    pub default_page_size: usize,

    /// Upper bound for `page_size`.
    pub max_page_size: usize,

    /// Number of tokio worker threads.
    pub worker_threads: usize,
}

/// Search-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Groups of interchangeable words, e.g. `["intro", "introduction", "101"]`.
    pub synonyms: Vec<Vec<String>>,

    /// Maximum entries per list in typeahead responses.
    pub typeahead_result_count: usize,

    /// Multiplier applied to authoring organization matches in typeahead.
    pub typeahead_org_boost: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: crate::paths::default_catalog_dir(),
            index_path: crate::paths::default_index_dir(),
            server: ServerConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8381".to_string(),
            public_base_url: "http://localhost:8381".to_string(),
            default_partner: "edx".to_string(),
            api_tokens: Vec::new(),
            default_page_size: 20,
            max_page_size: 100,
            worker_threads: num_cpus::get(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            synonyms: Vec::new(),
            typeahead_result_count: 3,
            typeahead_org_boost: 2.0,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self =
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;

        // Expand tilde (~) in paths
        config.expand_tilde_in_paths();
        config.validate()?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Expand tilde (~) in all path fields.
    fn expand_tilde_in_paths(&mut self) {
        self.catalog_path = Self::expand_tilde(&self.catalog_path);
        self.index_path = Self::expand_tilde(&self.index_path);
    }

    /// Expand tilde in a single path.
    fn expand_tilde(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        PathBuf::from(shellexpand::tilde(&path_str).into_owned())
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> crate::Result<()> {
        if self.server.default_page_size == 0 {
            return Err(crate::Error::Config(
                "server.default_page_size must be at least 1".to_string(),
            ));
        }
        if self.server.max_page_size < self.server.default_page_size {
            return Err(crate::Error::Config(format!(
                "server.max_page_size ({}) is smaller than server.default_page_size ({})",
                self.server.max_page_size, self.server.default_page_size
            )));
        }
        if self.search.typeahead_result_count == 0 {
            return Err(crate::Error::Config(
                "search.typeahead_result_count must be at least 1".to_string(),
            ));
        }
        if self.server.default_partner.trim().is_empty() {
            return Err(crate::Error::Config(
                "server.default_partner must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Ensure the index directory exists.
    pub fn ensure_index_dir(&self) -> crate::Result<()> {
        std::fs::create_dir_all(&self.index_path)?;
        Ok(())
    }

    /// Path of the persisted index snapshot.
    pub fn snapshot_file(&self) -> PathBuf {
        self.index_path.join("index.bin")
    }
}
